//! The signed authorization cookie payload.
//!
//! On the wire the cookie value is
//!
//! ```text
//! urlencode("s:" + "j:" + json + "." + signature)
//! ```
//!
//! where `json` is `{"identity":"...","issuedAt":<epoch ms>}`. The `s:` and
//! `j:` markers are the ones Express's `cookie-parser` uses for signed and
//! JSON cookies.

use crate::error::{SessionError, SessionResult};
use crate::signer::HmacSigner;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name of the authorization cookie.
pub const COOKIE_NAME: &str = "api-docs-authorized";

const SIGNED_PREFIX: &str = "s:";
const JSON_PREFIX: &str = "j:";

/// Who was authorized, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// The verified email address.
    pub identity: String,

    /// When the cookie was minted.
    #[serde(rename = "issuedAt", with = "chrono::serde::ts_milliseconds")]
    pub issued_at: DateTime<Utc>,
}

impl SessionToken {
    /// Creates a token for `identity` stamped at `issued_at`.
    pub fn new(identity: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            identity: identity.into(),
            // Sub-millisecond precision does not survive the cookie.
            issued_at: DateTime::from_timestamp_millis(issued_at.timestamp_millis())
                .unwrap_or(issued_at),
        }
    }

    /// Serializes and signs the token into a cookie value.
    pub fn encode(&self, signer: &HmacSigner) -> SessionResult<String> {
        let json = serde_json::to_string(self)?;
        let signed = signer.sign(&format!("{JSON_PREFIX}{json}"));
        Ok(urlencoding::encode(&format!("{SIGNED_PREFIX}{signed}")).into_owned())
    }

    /// Verifies and parses a cookie value.
    pub fn decode(raw: &str, signer: &HmacSigner) -> SessionResult<Self> {
        let value = urlencoding::decode(raw).map_err(|_| SessionError::Encoding)?;
        let signed = value
            .strip_prefix(SIGNED_PREFIX)
            .ok_or(SessionError::Unsigned)?;
        let payload = signer.unsign(signed)?;
        let json = payload.strip_prefix(JSON_PREFIX).ok_or(SessionError::NotJson)?;
        Ok(serde_json::from_str(json)?)
    }

    /// Returns true while `now - issued_at` is shorter than `duration`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, duration: Duration) -> bool {
        let age = now.timestamp_millis() - self.issued_at.timestamp_millis();
        let window = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        age < window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn signer() -> HmacSigner {
        HmacSigner::new("cookie-secret").unwrap()
    }

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_encoded_value_is_percent_encoded_signed_json() {
        let token = SessionToken::new("a@example.com", at(1_000));
        let encoded = token.encode(&signer()).unwrap();

        assert!(encoded.starts_with("s%3Aj%3A"));
        let decoded = urlencoding::decode(&encoded).unwrap();
        assert!(decoded.contains(r#""identity":"a@example.com""#));
        assert!(decoded.contains(r#""issuedAt":1000"#));
    }

    #[test]
    fn test_decode_recovers_token() {
        let token = SessionToken::new("a@example.com", at(1_700_000_000_123));
        let encoded = token.encode(&signer()).unwrap();
        assert_eq!(SessionToken::decode(&encoded, &signer()).unwrap(), token);
    }

    #[test]
    fn test_decode_rejects_other_secret() {
        let encoded = SessionToken::new("a@example.com", at(0))
            .encode(&HmacSigner::new("other").unwrap())
            .unwrap();
        assert!(matches!(
            SessionToken::decode(&encoded, &signer()),
            Err(SessionError::BadSignature)
        ));
    }

    #[test]
    fn test_decode_rejects_unsigned_value() {
        let raw = urlencoding::encode(r#"j:{"identity":"a@example.com","issuedAt":0}"#);
        assert!(matches!(
            SessionToken::decode(&raw, &signer()),
            Err(SessionError::Unsigned)
        ));
    }

    #[test]
    fn test_decode_rejects_signed_non_json() {
        let raw = format!("s:{}", signer().sign("plain"));
        assert!(matches!(
            SessionToken::decode(&raw, &signer()),
            Err(SessionError::NotJson)
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let raw = format!("s:{}", signer().sign(r#"j:{"identity":"a@example.com"}"#));
        assert!(matches!(
            SessionToken::decode(&raw, &signer()),
            Err(SessionError::Malformed(_))
        ));

        let raw = format!(
            "s:{}",
            signer().sign(r#"j:{"identity":"a@example.com","issuedAt":"yesterday"}"#)
        );
        assert!(SessionToken::decode(&raw, &signer()).is_err());
    }

    #[test]
    fn test_fresh_until_duration_elapses() {
        let t0 = 1_700_000_000_000;
        let token = SessionToken::new("a@example.com", at(t0));

        assert!(token.is_fresh(at(t0), HOUR));
        assert!(token.is_fresh(at(t0 + 3_600_000 - 1), HOUR));
        assert!(!token.is_fresh(at(t0 + 3_600_000), HOUR));
        assert!(!token.is_fresh(at(t0 + 3_600_001), HOUR));
    }

    #[test]
    fn test_zero_duration_is_never_fresh() {
        let token = SessionToken::new("a@example.com", at(0));
        assert!(!token.is_fresh(at(0), Duration::ZERO));
    }

    #[test]
    fn test_new_truncates_to_milliseconds() {
        let precise = at(1_234) + chrono::Duration::microseconds(567);
        let token = SessionToken::new("a@example.com", precise);
        assert_eq!(token.issued_at, at(1_234));
    }
}
