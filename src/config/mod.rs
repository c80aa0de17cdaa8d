use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use directories::ProjectDirs;

use crate::error::{ConfigError, Result};

pub mod builder;
pub mod env;
pub mod validation;

pub use builder::ConfigBuilder;

pub const DEFAULT_GENIUS_API_URL: &str = "https://genius-song-lyrics1.p.rapidapi.com";
pub const DEFAULT_GENIUS_API_HOST: &str = "genius-song-lyrics1.p.rapidapi.com";
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "deepseek-r1-distill-llama-70b";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_LYRICS_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// Process-wide settings, read once at startup and shared read-only.
///
/// API keys only ever come from the environment and are never serialized.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Genius search proxy on RapidAPI
    pub genius_api_url: String,

    /// Value sent in the `x-rapidapi-host` header
    pub genius_api_host: String,

    /// Base URL of the OpenAI-compatible Groq API
    pub groq_api_url: String,

    /// Chat model used for interpretations
    pub groq_model: String,

    /// Timeout for search and LLM calls (seconds)
    pub request_timeout_seconds: u64,

    /// Timeout for lyrics page fetches (seconds)
    pub lyrics_timeout_seconds: u64,

    /// Listen address for `verseen serve`
    pub bind_address: String,

    #[serde(skip)]
    pub rapid_api_key: Option<String>,

    #[serde(skip)]
    pub groq_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            genius_api_url: DEFAULT_GENIUS_API_URL.to_string(),
            genius_api_host: DEFAULT_GENIUS_API_HOST.to_string(),
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            lyrics_timeout_seconds: DEFAULT_LYRICS_TIMEOUT_SECONDS,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            rapid_api_key: None,
            groq_api_key: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(secret: &Option<String>) -> &'static str {
            if secret.is_some() { "<set>" } else { "<unset>" }
        }

        f.debug_struct("Config")
            .field("genius_api_url", &self.genius_api_url)
            .field("genius_api_host", &self.genius_api_host)
            .field("groq_api_url", &self.groq_api_url)
            .field("groq_model", &self.groq_model)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("lyrics_timeout_seconds", &self.lyrics_timeout_seconds)
            .field("bind_address", &self.bind_address)
            .field("rapid_api_key", &redact(&self.rapid_api_key))
            .field("groq_api_key", &redact(&self.groq_api_key))
            .finish()
    }
}

impl Config {
    /// Load configuration: `.env`, then the optional TOML file, then the
    /// environment (highest priority).
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Try to load .env file if it exists (for Docker and development)
        dotenvy::dotenv().ok();

        let config_file = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(ConfigError::FileNotFound { path }.into());
                }
                Some(path)
            }
            None => Self::default_config_path().filter(|path| path.exists()),
        };

        let mut builder = ConfigBuilder::new();
        if let Some(path) = config_file {
            builder = builder.load_file(&path)?;
        }

        builder.load_from_env()?.build()
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("app", "verseen", "verseen")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn lyrics_timeout(&self) -> Duration {
        Duration::from_secs(self.lyrics_timeout_seconds)
    }

    /// The lyrics-provider key, or a configuration error naming it
    pub fn require_rapid_api_key(&self) -> std::result::Result<&str, ConfigError> {
        Self::require(&self.rapid_api_key, env::EnvVars::RAPID_API_KEY)
    }

    /// The LLM-provider key, or a configuration error naming it
    pub fn require_groq_api_key(&self) -> std::result::Result<&str, ConfigError> {
        Self::require(&self.groq_api_key, env::EnvVars::GROQ_API_KEY)
    }

    fn require<'a>(
        secret: &'a Option<String>,
        field: &str,
    ) -> std::result::Result<&'a str, ConfigError> {
        secret
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: field.to_string(),
            })
    }
}
