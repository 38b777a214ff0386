//! Country extraction: prompt construction, the single completion call, and
//! normalization of the reply.

use crate::models::ExtractionResult;
use crate::services::metrics;
use crate::services::providers::{ProviderError, TextProvider};
use anyhow::anyhow;
use service_core::error::AppError;
use std::time::Instant;
use thiserror::Error;

/// Client-facing text for a missing or blank message.
pub const MESSAGE_REQUIRED: &str = "Message field is required";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{}", MESSAGE_REQUIRED)]
    EmptyMessage,

    #[error("Completion backend failed: {0}")]
    Backend(#[from] ProviderError),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::EmptyMessage => AppError::bad_request(MESSAGE_REQUIRED),
            ExtractionError::Backend(e) => AppError::InternalError(anyhow!(e)),
        }
    }
}

/// Build the instruction prompt for an already-trimmed description.
pub fn build_prompt(description: &str) -> String {
    format!(
        "Extract the ISO 3166-1 alpha-3 country code from the description below.\n\
         - Return ONLY the three-letter country code (e.g., USA, GBR, FRA)\n\
         - If multiple countries match, return the most relevant one\n\
         - If no country can be identified, return 'NONE'\n\
         - Do not include any explanation or additional text\n\
         Description: {}\n",
        description
    )
}

/// Resolve a free-text description to a country code.
///
/// Blank input is rejected before the provider is called; otherwise exactly
/// one `generate` call is made. Provider failures are not retried.
pub async fn extract_country(
    provider: &dyn TextProvider,
    message: &str,
) -> Result<ExtractionResult, ExtractionError> {
    let description = message.trim();
    if description.is_empty() {
        return Err(ExtractionError::EmptyMessage);
    }

    tracing::info!(description = %description, "Processing country extraction request");

    let prompt = build_prompt(description);
    let started = Instant::now();
    let response = provider.generate(&prompt).await;
    metrics::record_provider_latency(
        provider.name(),
        provider.model(),
        started.elapsed().as_secs_f64(),
    );

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                provider = provider.name(),
                model = provider.model(),
                error = %e,
                "Completion provider call failed"
            );
            metrics::record_provider_error(provider.name(), e.error_type());
            metrics::record_extraction("backend_error");
            return Err(e.into());
        }
    };

    metrics::record_tokens(
        provider.model(),
        response.input_tokens,
        response.output_tokens,
    );
    tracing::debug!(
        finish_reason = response.finish_reason.as_str(),
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Completion received"
    );

    let result = ExtractionResult::from_completion(&response.text);
    match &result.country_code {
        Some(code) => {
            tracing::info!(country_code = %code, "Successfully identified country");
            metrics::record_extraction("identified");
        }
        None => {
            tracing::warn!(
                description = %description,
                completion = %response.text.trim(),
                "No valid country code found"
            );
            metrics::record_extraction("no_match");
        }
    }

    Ok(result)
}
