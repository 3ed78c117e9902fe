//! Error taxonomy shared by the store, the editor and the upload pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure kinds surfaced by band and slide operations.
///
/// Every variant carries a human readable message. The type is cloneable so it can be
/// moved into UI messages and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum BandError {
    /// Malformed band or slide payload. Rejected before reaching the store.
    #[error("validation error: {0}")]
    Validation(String),
    /// A proposed ordering is not a permutation of the current identifiers.
    #[error("invalid ordering: {0}")]
    InvalidOrdering(String),
    /// The referenced band, slide or page does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Network or storage unavailability.
    #[error("transport error: {0}")]
    Transport(String),
    /// An upload whose declared media type is not an image.
    #[error("invalid file type: {0}")]
    InvalidFileType(String),
}

impl BandError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_ordering(message: impl Into<String>) -> Self {
        Self::InvalidOrdering(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// The message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            BandError::Validation(message)
            | BandError::InvalidOrdering(message)
            | BandError::NotFound(message)
            | BandError::Transport(message)
            | BandError::InvalidFileType(message) => message,
        }
    }
}
