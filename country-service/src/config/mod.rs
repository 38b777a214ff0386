use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

use crate::services::providers::gemini::{GeminiConfig, GEMINI_API_BASE};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct CountryConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Model for country extraction (e.g., gemini-2.5-flash)
    pub model: String,
    pub api_base: String,
    /// Upper bound for a single completion call
    pub timeout_secs: u64,
}

impl CountryConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the service configuration from `lookup`, which resolves
    /// variable names to values. Empty values count as unset.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";

        let timeout_secs = get_env(
            &lookup,
            "GEMINI_TIMEOUT_SECS",
            Some(&DEFAULT_TIMEOUT_SECS.to_string()),
            is_prod,
        )?;
        let timeout_secs = match timeout_secs.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "GEMINI_TIMEOUT_SECS must be a positive integer, got {:?}",
                    timeout_secs
                )))
            }
        };

        Ok(CountryConfig {
            common,
            google: GoogleConfig {
                api_key: Secret::new(get_env(&lookup, "GOOGLE_API_KEY", None, is_prod)?),
            },
            gemini: GeminiSettings {
                model: get_env(&lookup, "GEMINI_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                api_base: get_env(&lookup, "GEMINI_API_BASE", Some(GEMINI_API_BASE), is_prod)?,
                timeout_secs,
            },
        })
    }

    /// Provider settings derived from this configuration.
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.google.api_key.clone(),
            model: self.gemini.model.clone(),
            api_base: self.gemini.api_base.clone(),
            timeout: Duration::from_secs(self.gemini.timeout_secs),
        }
    }
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
