//! Session error types.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Why a session cookie could not be read or written.
///
/// The authorizer never surfaces these to the client; a cookie that fails to
/// decode is simply treated as absent.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The signing secret was rejected by the MAC.
    #[error("invalid signing key")]
    InvalidKey,

    /// The cookie value is not percent-decodable UTF-8.
    #[error("cookie value is not valid percent-encoding")]
    Encoding,

    /// The value does not carry the signed-cookie marker.
    #[error("cookie is not signed")]
    Unsigned,

    /// The signature does not match the payload.
    #[error("cookie signature mismatch")]
    BadSignature,

    /// The signed value does not carry the JSON marker.
    #[error("cookie payload is not JSON")]
    NotJson,

    /// The payload is not a session token.
    #[error("malformed session payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The serialized cookie cannot be sent as a header.
    #[error("invalid Set-Cookie header: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_wraps_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SessionError::from(json_err);
        assert!(err.to_string().starts_with("malformed session payload"));
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionError::BadSignature.to_string(), "cookie signature mismatch");
        assert_eq!(SessionError::Unsigned.to_string(), "cookie is not signed");
    }
}
