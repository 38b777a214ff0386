use serde::{Deserialize, Serialize};
use std::fmt;

/// Token the model is told to answer with when no country fits.
pub const NO_MATCH_SENTINEL: &str = "NONE";

/// Message attached to a result when no country was identified.
pub const NO_COUNTRY_MESSAGE: &str = "No country identified";

/// Body of `POST /get-country`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// A three-letter uppercase ASCII code, as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Normalize a raw completion (trim, uppercase) and accept it only if it
    /// is exactly three ASCII letters and not the `NONE` sentinel.
    ///
    /// Anything chattier than a bare code is rejected rather than scanned.
    pub fn from_completion(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_uppercase();

        if normalized == NO_MATCH_SENTINEL {
            return None;
        }
        if normalized.len() != 3 || !normalized.bytes().all(|b| b.is_ascii_uppercase()) {
            return None;
        }

        Some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one extraction, returned verbatim as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub country_code: Option<CountryCode>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExtractionResult {
    pub fn identified(code: CountryCode) -> Self {
        Self {
            country_code: Some(code),
            success: true,
            message: None,
        }
    }

    pub fn no_match() -> Self {
        Self {
            country_code: None,
            success: false,
            message: Some(NO_COUNTRY_MESSAGE.to_string()),
        }
    }

    /// Build the result for a raw completion text.
    pub fn from_completion(raw: &str) -> Self {
        match CountryCode::from_completion(raw) {
            Some(code) => Self::identified(code),
            None => Self::no_match(),
        }
    }
}
