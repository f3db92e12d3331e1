//! Error category classification.
//!
//! Categories drive retry decisions and the hint printed next to an error.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS or timeout problems. Transient.
    Network,

    /// The stats server misbehaved or went away. Transient.
    Server,

    /// Programming errors or malformed data from the peer.
    Client,

    /// Invalid command-line input.
    User,

    /// OS errors (sockets, terminal, files).
    System,

    /// Invalid environment or configuration values.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Suggested recovery action for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the stats server is reachable and try again",
            ErrorCategory::Server => "The stats server may be restarting. Please try again later",
            ErrorCategory::Client => "This may be a bug. Please report this issue if it persists",
            ErrorCategory::User => "Run `citrate --help` for usage",
            ErrorCategory::System => "Check that the address is free and the terminal is usable",
            ErrorCategory::Configuration => "Check the CITRATE_* environment variables",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
