//! Error handling for the verseen application
//!
//! This module provides a hierarchical error system. Each pipeline stage has
//! its own error enum so callers can branch on the exact cause, and the
//! top-level `VerseenError` wraps them for the command and server layers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerseenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Song search error: {0}")]
    Search(#[from] SearchError),

    #[error("Lyrics fetch error: {0}")]
    Lyrics(#[from] LyricsError),

    #[error("Interpretation error: {0}")]
    Interpretation(#[from] InterpretationError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    #[error("Missing required setting: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the song search stage.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search failed{}: {reason}", status_suffix(.status))]
    SearchFailed { status: Option<u16>, reason: String },

    #[error("Failed to parse search response: {0}")]
    ParseFailed(#[from] serde_json::Error),
}

/// Failures of the lyrics page fetch and extraction stage.
#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("Request timed out")]
    RequestTimeout,

    #[error("Request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    #[error("Failed to fetch page. Status code: {0}")]
    FetchFailed(u16),

    #[error("Lyrics container not found. The page structure might have changed")]
    LyricsContainerNotFound,

    #[error("Lyrics container found but it held no lyrics")]
    EmptyLyrics,
}

/// Failures of the LLM interpretation stage.
#[derive(Error, Debug)]
pub enum InterpretationError {
    #[error("Interpretation service error{}: {reason}", status_suffix(.status))]
    InterpretationServiceError { status: Option<u16>, reason: String },

    #[error("Malformed tool response: {0}")]
    MalformedToolResponse(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VerseenError>;

/// Reason recorded when an outbound call hits its client timeout
pub const REQUEST_TIMED_OUT: &str = "request timed out";

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

fn request_failure_reason(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        REQUEST_TIMED_OUT.to_string()
    } else {
        err.to_string()
    }
}

impl SearchError {
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        SearchError::SearchFailed {
            status: err.status().map(|s| s.as_u16()),
            reason: request_failure_reason(&err),
        }
    }
}

impl From<reqwest::Error> for LyricsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LyricsError::RequestTimeout
        } else {
            LyricsError::RequestFailed(err)
        }
    }
}

impl InterpretationError {
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        InterpretationError::InterpretationServiceError {
            status: err.status().map(|s| s.as_u16()),
            reason: request_failure_reason(&err),
        }
    }

    /// Upstream HTTP status, when the service answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            InterpretationError::InterpretationServiceError { status, .. } => *status,
            InterpretationError::MalformedToolResponse(_) => None,
        }
    }
}

impl From<toml::de::Error> for VerseenError {
    fn from(err: toml::de::Error) -> Self {
        VerseenError::Config(ConfigError::InvalidFormat(err))
    }
}

impl From<std::io::Error> for VerseenError {
    fn from(err: std::io::Error) -> Self {
        VerseenError::Internal(err.into())
    }
}
