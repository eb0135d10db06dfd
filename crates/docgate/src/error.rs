//! Facade error type.

use docgate_config::ConfigError;
use docgate_docs::DocsError;
use docgate_oauth::GateError;
use docgate_session::SessionError;
use thiserror::Error;

/// Result type for [`ApiDocs`](crate::ApiDocs) operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the facade.
///
/// Each variant wraps the error of the crate that raised it, so callers can
/// use `?` across registration and gate construction alike.
#[derive(Debug, Error)]
pub enum Error {
    /// A path or definition was rejected by the document.
    #[error(transparent)]
    Docs(#[from] DocsError),

    /// The OAuth gate could not be built.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// The OAuth configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The session signer could not be set up.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Docs(DocsError::Serialization(err))
    }
}
