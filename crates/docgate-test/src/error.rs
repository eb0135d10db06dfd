//! Test error types.

use docgate_middleware::MiddlewareError;
use thiserror::Error;

/// Errors that can occur during testing.
#[derive(Debug, Error)]
pub enum TestError {
    /// Request building failed
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// Response body reading failed
    #[error("Body read error: {0}")]
    BodyRead(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The chain under test failed
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] MiddlewareError),

    /// Header value is invalid
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}
