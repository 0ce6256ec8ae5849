//! Unified error types for the ContextForce client.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Unified error type returned by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid argument or argument combination. Raised before any request is sent.
    #[error("VALIDATION_ERROR: {0}")]
    Validation(String),

    /// Non-2xx response. `body` is the raw response text.
    #[error("HTTP_ERROR: status {status}: {body}")]
    Http { status: u16, body: String },

    /// Local file could not be read for upload.
    #[error("IO_ERROR: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport failure (connect, TLS, body read).
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("TIMEOUT: {0}")]
    Timeout(String),

    /// Response declared JSON but the body did not parse, or a typed decode failed.
    #[error("DECODE_ERROR: {0}")]
    Decode(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// HTTP status code carried by [`Error::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
