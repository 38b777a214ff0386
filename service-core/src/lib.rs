//! service-core: Shared infrastructure for the LLM Map API services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
