//! Error types for remixflow.
//!
//! All errors are represented by the `RemixError` enum. Nodes never downgrade
//! an error into a degraded output: every variant is handed back to the host.

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all remixflow operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum RemixError {
    /// A node dereferenced the remote context before a start-context node ran,
    /// or after an end-context node cleared it.
    #[error("no active remix context for session '{0}', add a start context node first")]
    NoActiveContext(String),

    /// The remote service answered with a non-success status code.
    #[error("request to {url} failed with status {code}: {body}")]
    HttpStatus {
        code: u16,
        url: String,
        body: String,
    },

    /// The response JSON did not have the expected structure.
    #[error("{0}")]
    MissingField(String),

    /// A referenced file or directory does not exist.
    #[error("{0}")]
    FileNotFound(String),

    /// An input or a remote value is not acceptable.
    #[error("{0}")]
    Value(String),

    /// Transport level failure (connection refused, broken body, ...).
    #[error("http error: {0}")]
    Transport(String),

    /// Data conversion errors (JSON, base64, ...).
    #[error("{0}")]
    Convert(String),

    /// Configuration parsing errors.
    #[error("{0}")]
    Config(String),

    /// Node definition errors (unknown type, invalid params).
    #[error("{0}")]
    Node(String),

    /// Image decoding or encoding errors.
    #[error("{0}")]
    Image(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl From<std::io::Error> for RemixError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => RemixError::FileNotFound(error.to_string()),
            _ => RemixError::IoError(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for RemixError {
    fn from(error: serde_json::Error) -> Self {
        RemixError::Convert(error.to_string())
    }
}

impl From<jsonschema::ValidationError<'_>> for RemixError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        RemixError::Node(error.to_string())
    }
}

impl From<reqwest::Error> for RemixError {
    fn from(error: reqwest::Error) -> Self {
        RemixError::Transport(error.to_string())
    }
}

impl From<image::ImageError> for RemixError {
    fn from(error: image::ImageError) -> Self {
        RemixError::Image(error.to_string())
    }
}

impl From<base64::DecodeError> for RemixError {
    fn from(error: base64::DecodeError) -> Self {
        RemixError::Convert(error.to_string())
    }
}
