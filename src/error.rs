//! # Error Types
//!
//! Custom error types for Seder using `thiserror`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Seder
#[derive(Debug, Error)]
pub enum SederError {
    /// Upload body is truncated or structurally invalid
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Filesystem failure while persisting samples or reading configuration
    #[error("I/O failure at {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl SederError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        SederError::IoFailure {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Result type alias for Seder
pub type Result<T> = std::result::Result<T, SederError>;
