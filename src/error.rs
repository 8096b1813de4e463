//! Custom error types for release-herald with improved type safety and error handling.

use thiserror::Error;

/// Main error type for release-herald operations.
///
/// The first four variants are the domain conditions the presentation layer
/// branches on to pick a spoken response; everything below them classifies
/// unanticipated failures that propagate for logging and a generic message.
#[derive(Error, Debug)]
pub enum HeraldError {
    // Domain conditions raised by the orchestrator
    #[error("no repositories found for the authenticated user")]
    NoRepositoriesFound,

    #[error("could not identify a repository from \"{input}\" with enough certainty")]
    InsufficientCertainty {
        input: String,
        candidates: Vec<String>,
    },

    #[error("failed to create release: {0}")]
    CreateRelease(String),

    #[error("invalid version bump keyword: {0}")]
    InvalidBumpKeyword(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Forge/API errors
    #[error("Forge operation failed: {0}")]
    Forge(String),

    #[error("Network request failed: {0}")]
    Network(String),

    #[error("API authentication failed: {0}")]
    Authentication(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    // Parsing errors - automatic conversions via #[from]
    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Datetime parse error: {0}")]
    ChronoParseError(#[from] chrono::ParseError),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using HeraldError
pub type Result<T> = std::result::Result<T, HeraldError>;

impl HeraldError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::Forge(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a create-release error
    pub fn create_release(msg: impl Into<String>) -> Self {
        Self::CreateRelease(msg.into())
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for HeraldError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for HeraldError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Network(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status() {
                if status.as_u16() == 401 || status.as_u16() == 403 {
                    Self::Authentication(err.to_string())
                } else if status.as_u16() == 429 {
                    Self::RateLimitExceeded
                } else {
                    Self::Network(err.to_string())
                }
            } else {
                Self::Network(err.to_string())
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for HeraldError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            octocrab::Error::GitHub { source, .. }
                if source.status_code.as_u16() == 401
                    || source.status_code.as_u16() == 403 =>
            {
                Self::Authentication(source.message.clone())
            }
            _ => Self::Forge(format!("GitHub API error: {}", err)),
        }
    }
}
