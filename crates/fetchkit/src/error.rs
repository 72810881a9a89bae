//! Error types for artifact resolution and download.

use std::io;

/// Result type alias for fetchkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or downloading an artifact.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote endpoint could not be reached, timed out, or answered
    /// with an error status. Distinct from [`Error::NoCandidate`]: the
    /// source was unreachable, not empty.
    #[error("network error: {message}")]
    Network {
        /// Error message.
        message: String,
        /// HTTP status code if the server answered at all.
        status: Option<u16>,
    },

    /// The source was fetched successfully but offered nothing matching
    /// the request.
    #[error("no matching download found: {0}")]
    NoCandidate(String),

    /// The source answered with something we could not make sense of.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// IO error while writing a download to disk.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a network error without a status code.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Network {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Network {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
