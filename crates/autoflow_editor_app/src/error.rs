// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the command-line host
#[derive(Debug, Error)]
pub enum AppError {
    /// File system failure
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Malformed JSON or a graph that breaks its invariants
    #[error("Invalid JSON in {path:?}: {source}")]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// Malformed RON configuration
    #[error("Invalid config {path:?}: {source}")]
    Config {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: ron::error::SpannedError,
    },

    /// Serialization failure on output
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON error with the path it happened on
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
