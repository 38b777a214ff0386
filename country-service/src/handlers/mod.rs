//! HTTP handlers for the country service.

pub mod country;
pub mod health;
pub mod metrics;

pub use country::get_country;
pub use health::{health_check, readiness_check};
