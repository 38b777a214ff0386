pub mod extraction;
pub mod metrics;
pub mod providers;

pub use extraction::{build_prompt, extract_country, ExtractionError};
