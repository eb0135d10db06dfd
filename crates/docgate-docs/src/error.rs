//! Error types for the documentation crate.

use thiserror::Error;

/// Errors raised while building an API document.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The same verb and path were documented twice.
    #[error("{verb} {path} is declared twice")]
    DuplicatePath {
        /// Lower-case HTTP verb.
        verb: String,
        /// Documented path.
        path: String,
    },

    /// The same definition name was registered twice.
    #[error("definition '{name}' is declared twice")]
    DuplicateDefinition {
        /// Definition name.
        name: String,
    },

    /// A value could not be converted to or from JSON.
    #[error("failed to serialize API document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
