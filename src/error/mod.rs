//! Error types for Citrate.
//!
//! [`CitrateError`] covers everything that can fail at the edges of the
//! process: configuration, argument parsing, sockets and the terminal.
//! The streaming hot paths use their own narrow error types
//! ([`crate::traits::DeliveryError`], [`crate::client::ParseError`]) and
//! never surface to the user as failures.

mod category;

pub use category::ErrorCategory;

use thiserror::Error;

/// Type alias for Results using [`CitrateError`].
pub type CitrateResult<T> = Result<T, CitrateError>;

/// Unified error type for the library.
#[derive(Debug, Error)]
pub enum CitrateError {
    /// An environment variable or config value could not be used.
    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },

    /// Command-line arguments could not be parsed.
    #[error("Invalid arguments: {0}")]
    Usage(String),

    /// Connecting to or talking with a remote endpoint failed.
    #[error("Network error talking to '{url}': {message}")]
    Network { url: String, message: String },

    /// The stats stream broke in an unrecoverable way.
    #[error("Stream error: {0}")]
    Stream(String),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Ui(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CitrateError {
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        CitrateError::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        CitrateError::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CitrateError::Config { .. } => ErrorCategory::Configuration,
            CitrateError::Usage(_) => ErrorCategory::User,
            CitrateError::Network { .. } => ErrorCategory::Network,
            CitrateError::Stream(_) => ErrorCategory::Server,
            CitrateError::Ui(_) | CitrateError::Io(_) => ErrorCategory::System,
        }
    }

    /// Check if the failed operation can reasonably be retried.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Recovery hint for the user.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl From<reqwest::Error> for CitrateError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        CitrateError::network(url, err.to_string())
    }
}
