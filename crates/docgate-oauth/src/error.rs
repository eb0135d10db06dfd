//! Error types for identity verification.

use docgate_config::ConfigError;
use docgate_session::SessionError;
use thiserror::Error;

/// Result type for verification operations.
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Result type for building a gate.
pub type GateResult<T> = Result<T, GateError>;

/// Errors raised while constructing an [`OAuthGate`](crate::OAuthGate).
#[derive(Debug, Error)]
pub enum GateError {
    /// The OAuth configuration is incomplete.
    #[error("invalid OAuth configuration: {0}")]
    Config(#[from] ConfigError),

    /// The session signer could not be set up.
    #[error("session setup failed: {0}")]
    Session(#[from] SessionError),
}

/// Why an identity could not be established.
///
/// The gate recovers from every variant by redirecting back to the
/// challenge page with `failed=true`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifyError {
    /// The provider reported an error on the callback (e.g. `access_denied`).
    #[error("provider denied the request: {0}")]
    Denied(String),

    /// The callback carried neither a code nor an error.
    #[error("callback is missing the authorization code")]
    MissingCode,

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Response body, for logging.
        body: String,
    },

    /// Transport failure talking to the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The authorization URL could not be built.
    #[error("invalid authorization request: {0}")]
    InvalidRequest(String),

    /// A verifier rejected the identity for its own reasons.
    #[error("verification rejected: {0}")]
    Rejected(String),
}

impl VerifyError {
    /// Create a provider status error.
    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        Self::Provider {
            status,
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_display() {
        let err = VerifyError::provider(400, "invalid_grant");
        assert_eq!(err.to_string(), "provider returned status 400: invalid_grant");
    }

    #[test]
    fn test_denied_display() {
        let err = VerifyError::Denied("access_denied".to_string());
        assert!(err.to_string().contains("access_denied"));
    }
}
