//! Error types for editor setup and host-boundary parsing.
//!
//! Interaction operations never fail: unknown ids are ignored and
//! out-of-range geometry is saturated. These errors only cover parsing
//! strings and documents handed over by the host page.

use thiserror::Error;

/// Result type for fallible editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur while parsing host input.
#[derive(Debug, Error)]
pub enum EditorError {
    /// String is not a valid element ID.
    #[error("Invalid element id: {0}")]
    InvalidElementId(String),

    /// String does not name an element kind.
    #[error("Unknown element kind: {0}")]
    UnknownKind(String),

    /// String does not name a resize handle.
    #[error("Unknown resize handle: {0}")]
    UnknownHandle(String),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config, template or snapshot (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
