//! Request and response shapes for country extraction.

pub mod extraction;

pub use extraction::{CountryCode, ExtractionRequest, ExtractionResult};
