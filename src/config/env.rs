use std::env;
use crate::error::{Result, VerseenError};

/// Environment variable configuration constants
pub struct EnvVars;

impl EnvVars {
    // Secrets, kept under the provider-facing names
    pub const RAPID_API_KEY: &'static str = "RAPID_API_KEY";
    pub const GROQ_API_KEY: &'static str = "GROQ_API_KEY";

    pub const GENIUS_API_URL: &'static str = "VERSEEN_GENIUS_API_URL";
    pub const GENIUS_API_HOST: &'static str = "VERSEEN_GENIUS_API_HOST";
    pub const GROQ_API_URL: &'static str = "VERSEEN_GROQ_API_URL";
    pub const GROQ_MODEL: &'static str = "VERSEEN_GROQ_MODEL";
    pub const REQUEST_TIMEOUT_SECONDS: &'static str = "VERSEEN_REQUEST_TIMEOUT_SECONDS";
    pub const LYRICS_TIMEOUT_SECONDS: &'static str = "VERSEEN_LYRICS_TIMEOUT_SECONDS";
    pub const BIND_ADDRESS: &'static str = "VERSEEN_BIND_ADDRESS";
}

/// Environment variable parsing utilities with validation
pub struct EnvParser;

impl EnvParser {
    /// Parse environment variable as string with validation
    pub fn parse_string(var_name: &str, validator: Option<fn(&str) -> Result<()>>) -> Result<Option<String>> {
        match env::var(var_name) {
            Ok(value) => {
                let trimmed = value.trim().to_string();
                if trimmed.is_empty() {
                    return Ok(None);
                }

                if let Some(validate_fn) = validator {
                    validate_fn(&trimmed)?;
                }

                Ok(Some(trimmed))
            }
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => {
                Err(VerseenError::Validation(format!(
                    "Environment variable {} contains invalid UTF-8",
                    var_name
                )))
            }
        }
    }

    /// Parse environment variable as u64 with range validation
    pub fn parse_u64(var_name: &str, min: u64, max: u64) -> Result<Option<u64>> {
        if let Some(value_str) = Self::parse_string(var_name, None)? {
            let value = value_str.parse::<u64>().map_err(|_| {
                VerseenError::Validation(format!(
                    "Invalid number in {}: '{}'. Must be a positive integer",
                    var_name, value_str
                ))
            })?;

            if value < min || value > max {
                return Err(VerseenError::Validation(format!(
                    "Value in {} must be between {} and {}, got {}",
                    var_name, min, max, value
                )));
            }

            Ok(Some(value))
        } else {
            Ok(None)
        }
    }
}
