use std::net::SocketAddr;
use url::Url;
use crate::error::{Result, VerseenError};

/// Centralized configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate an http(s) URL string
    pub fn validate_url(url: &str, field_name: &str) -> Result<()> {
        let parsed = Url::parse(url).map_err(|e| {
            VerseenError::Validation(format!("Invalid {} URL '{}': {}", field_name, url, e))
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(VerseenError::Validation(format!(
                "{} URL must use http or https, got: {}",
                field_name, url
            )));
        }
        Ok(())
    }

    /// Validate numeric range
    pub fn validate_range<T>(value: T, min: T, max: T, field_name: &str) -> Result<()>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            return Err(VerseenError::Validation(format!(
                "{} must be between {} and {}, got {}",
                field_name, min, max, value
            )));
        }
        Ok(())
    }

    /// Validate a `host:port` listen address
    pub fn validate_bind_address(addr: &str) -> Result<()> {
        addr.parse::<SocketAddr>().map_err(|e| {
            VerseenError::Validation(format!("Invalid bind address '{}': {}", addr, e))
        })?;
        Ok(())
    }

    /// Validate a bare host name as sent in a header
    pub fn validate_host(host: &str, field_name: &str) -> Result<()> {
        if host.is_empty() || host.contains('/') || host.contains(char::is_whitespace) {
            return Err(VerseenError::Validation(format!(
                "{} must be a bare host name, got: '{}'",
                field_name, host
            )));
        }
        Ok(())
    }
}
