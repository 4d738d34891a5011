//! Failure detail carried by error states.

use serde::{Deserialize, Serialize};

/// Detail attached to an error state: enough to render or report the
/// failure, nothing more.
///
/// Implements [`std::error::Error`] so it composes with error-reporting
/// machinery; derives serde both ways because failure reports do cross
/// process boundaries (logs, telemetry sinks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ErrorDetail {
    /// Optional protocol-level status code (e.g. an HTTP status).
    pub status: Option<u16>,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ErrorDetail {
    /// Detail with a message and no status code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Detail with a status code and a message.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Detail from any displayable collaborator error.
    pub fn from_display(err: impl std::fmt::Display) -> Self {
        Self::new(err.to_string())
    }
}
