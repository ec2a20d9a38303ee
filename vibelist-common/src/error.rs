//! Common error types for vibelist
//!
//! One taxonomy is shared by the synthesis pipeline and its callers. The type is
//! `Clone` because a single pipeline outcome is handed to every caller attached
//! to the same in-flight run.

use thiserror::Error;

/// Common result type for vibelist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across vibelist crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Missing or unusable credential / configuration. Terminal: the user must
    /// fix their setup, retrying will not help.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input (e.g. neither prompt nor image)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Non-2xx answer from an external service
    #[error("Upstream error {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body text (may be empty)
        body: String,
    },

    /// Transport failure, or a 2xx response whose body could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// Vibe extraction produced nothing usable
    #[error("Vibe extraction failed: {0}")]
    ExtractionFailed(String),

    /// Structured playlist output could not be parsed
    #[error("Invalid playlist format: {0}")]
    InvalidPlaylistFormat(String),

    /// Internal error (task failure, poisoned state)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Human-readable message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(_) => {
                "API key missing. Please check your environment configuration.".to_string()
            }
            Error::InvalidInput(msg) => msg.clone(),
            Error::Upstream { status, .. } => {
                format!("The music service returned an error ({status}). Please try again.")
            }
            Error::Network(_) => "Could not reach the music service. Please try again.".to_string(),
            Error::ExtractionFailed(_) => "Failed to analyze your request. Please try again.".to_string(),
            Error::InvalidPlaylistFormat(_) => {
                "Failed to parse playlist response. Please try again.".to_string()
            }
            Error::Internal(_) => "Unknown error occurred".to_string(),
        }
    }

    /// Whether re-invoking the same operation cannot succeed without a setup change
    pub fn is_terminal(&self) -> bool {
        matches!(self, Error::Config(_) | Error::InvalidInput(_))
    }
}
