//! LLM Map API.
//!
//! Turns a free-text description ("I live in Paris") into an ISO 3166-1
//! alpha-3 country code by asking a text-completion model and validating
//! its reply.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

/// Human-readable service name reported by the health endpoints.
pub const SERVICE_NAME: &str = "LLM Map API";
