use std::fs;
use std::path::Path;
use tracing::debug;
use crate::error::{ConfigError, Result};
use crate::config::validation::ConfigValidator;
use crate::config::env::{EnvVars, EnvParser};
use crate::config::{
    Config, DEFAULT_BIND_ADDRESS, DEFAULT_GENIUS_API_HOST, DEFAULT_GENIUS_API_URL,
    DEFAULT_GROQ_API_URL, DEFAULT_GROQ_MODEL, DEFAULT_LYRICS_TIMEOUT_SECONDS,
    DEFAULT_REQUEST_TIMEOUT_SECONDS,
};

const MIN_TIMEOUT_SECONDS: u64 = 1;
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Configuration builder with validation and type safety
#[derive(Default)]
pub struct ConfigBuilder {
    genius_api_url: Option<String>,
    genius_api_host: Option<String>,
    groq_api_url: Option<String>,
    groq_model: Option<String>,
    request_timeout_seconds: Option<u64>,
    lyrics_timeout_seconds: Option<u64>,
    bind_address: Option<String>,
    rapid_api_key: Option<String>,
    groq_api_key: Option<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Genius search API base URL with validation
    pub fn genius_api_url<S: Into<String>>(mut self, url: S) -> Result<Self> {
        let url = url.into();
        ConfigValidator::validate_url(&url, "Genius API")?;
        self.genius_api_url = Some(url.trim_end_matches('/').to_string());
        Ok(self)
    }

    /// Set the RapidAPI host header value with validation
    pub fn genius_api_host<S: Into<String>>(mut self, host: S) -> Result<Self> {
        let host = host.into();
        ConfigValidator::validate_host(&host, "Genius API host")?;
        self.genius_api_host = Some(host);
        Ok(self)
    }

    /// Set the Groq API base URL with validation
    pub fn groq_api_url<S: Into<String>>(mut self, url: S) -> Result<Self> {
        let url = url.into();
        ConfigValidator::validate_url(&url, "Groq API")?;
        self.groq_api_url = Some(url.trim_end_matches('/').to_string());
        Ok(self)
    }

    /// Set the chat model
    pub fn groq_model<S: Into<String>>(mut self, model: S) -> Self {
        self.groq_model = Some(model.into());
        self
    }

    /// Set the search/LLM timeout with validation
    pub fn request_timeout_seconds(mut self, seconds: u64) -> Result<Self> {
        ConfigValidator::validate_range(seconds, MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS, "request timeout seconds")?;
        self.request_timeout_seconds = Some(seconds);
        Ok(self)
    }

    /// Set the lyrics page timeout with validation
    pub fn lyrics_timeout_seconds(mut self, seconds: u64) -> Result<Self> {
        ConfigValidator::validate_range(seconds, MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS, "lyrics timeout seconds")?;
        self.lyrics_timeout_seconds = Some(seconds);
        Ok(self)
    }

    /// Set the HTTP listen address with validation
    pub fn bind_address<S: Into<String>>(mut self, addr: S) -> Result<Self> {
        let addr = addr.into();
        ConfigValidator::validate_bind_address(&addr)?;
        self.bind_address = Some(addr);
        Ok(self)
    }

    pub fn rapid_api_key<S: Into<String>>(mut self, key: Option<S>) -> Self {
        self.rapid_api_key = key.map(Into::into);
        self
    }

    pub fn groq_api_key<S: Into<String>>(mut self, key: Option<S>) -> Self {
        self.groq_api_key = key.map(Into::into);
        self
    }

    /// Load non-secret settings from a TOML file
    pub fn load_file(self, path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let file_config: Config = toml::from_str(&content)?;

        self.genius_api_url(file_config.genius_api_url)?
            .genius_api_host(file_config.genius_api_host)?
            .groq_api_url(file_config.groq_api_url)?
            .groq_model(file_config.groq_model)
            .request_timeout_seconds(file_config.request_timeout_seconds)?
            .lyrics_timeout_seconds(file_config.lyrics_timeout_seconds)?
            .bind_address(file_config.bind_address)
    }

    /// Load values from environment variables with validation
    pub fn load_from_env(mut self) -> Result<Self> {
        // Secrets
        if let Some(key) = EnvParser::parse_string(EnvVars::RAPID_API_KEY, None)? {
            self = self.rapid_api_key(Some(key));
        }

        if let Some(key) = EnvParser::parse_string(EnvVars::GROQ_API_KEY, None)? {
            self = self.groq_api_key(Some(key));
        }

        // Endpoints
        if let Some(url) = EnvParser::parse_string(EnvVars::GENIUS_API_URL, None)? {
            self = self.genius_api_url(url)?;
        }

        if let Some(host) = EnvParser::parse_string(EnvVars::GENIUS_API_HOST, None)? {
            self = self.genius_api_host(host)?;
        }

        if let Some(url) = EnvParser::parse_string(EnvVars::GROQ_API_URL, None)? {
            self = self.groq_api_url(url)?;
        }

        if let Some(model) = EnvParser::parse_string(EnvVars::GROQ_MODEL, None)? {
            self = self.groq_model(model);
        }

        // Numeric values with validation
        if let Some(seconds) = EnvParser::parse_u64(EnvVars::REQUEST_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS)? {
            self = self.request_timeout_seconds(seconds)?;
        }

        if let Some(seconds) = EnvParser::parse_u64(EnvVars::LYRICS_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS)? {
            self = self.lyrics_timeout_seconds(seconds)?;
        }

        if let Some(addr) = EnvParser::parse_string(EnvVars::BIND_ADDRESS, Some(|addr| {
            ConfigValidator::validate_bind_address(addr)
        }))? {
            self = self.bind_address(addr)?;
        }

        Ok(self)
    }

    /// Build the configuration with defaults
    pub fn build(self) -> Result<Config> {
        let config = Config {
            genius_api_url: self.genius_api_url
                .unwrap_or_else(|| DEFAULT_GENIUS_API_URL.to_string()),
            genius_api_host: self.genius_api_host
                .unwrap_or_else(|| DEFAULT_GENIUS_API_HOST.to_string()),
            groq_api_url: self.groq_api_url
                .unwrap_or_else(|| DEFAULT_GROQ_API_URL.to_string()),
            groq_model: self.groq_model
                .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            request_timeout_seconds: self.request_timeout_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
            lyrics_timeout_seconds: self.lyrics_timeout_seconds
                .unwrap_or(DEFAULT_LYRICS_TIMEOUT_SECONDS),
            bind_address: self.bind_address
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            rapid_api_key: self.rapid_api_key,
            groq_api_key: self.groq_api_key,
        };

        // Final validation
        config.validate()?;

        Ok(config)
    }
}

impl Config {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_url(&self.genius_api_url, "Genius API")?;
        ConfigValidator::validate_host(&self.genius_api_host, "Genius API host")?;
        ConfigValidator::validate_url(&self.groq_api_url, "Groq API")?;

        if self.groq_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "groq_model".to_string(),
                value: self.groq_model.clone(),
            }
            .into());
        }

        ConfigValidator::validate_range(
            self.request_timeout_seconds,
            MIN_TIMEOUT_SECONDS,
            MAX_TIMEOUT_SECONDS,
            "request timeout seconds",
        )?;

        ConfigValidator::validate_range(
            self.lyrics_timeout_seconds,
            MIN_TIMEOUT_SECONDS,
            MAX_TIMEOUT_SECONDS,
            "lyrics timeout seconds",
        )?;

        ConfigValidator::validate_bind_address(&self.bind_address)?;

        Ok(())
    }
}
