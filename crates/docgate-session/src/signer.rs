//! HMAC-SHA256 cookie signing.
//!
//! Signed values take the form `<value>.<signature>`, where the signature
//! is the unpadded standard base64 of `HMAC-SHA256(secret, value)`. This is
//! the layout Express's `cookie-signature` produces, so cookies minted by an
//! older deployment sharing the same secret stay readable.

use crate::error::{SessionError, SessionResult};
use base64::{engine::general_purpose::STANDARD_NO_PAD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies cookie values with a deployment secret.
#[derive(Clone)]
pub struct HmacSigner {
    mac: HmacSha256,
}

impl HmacSigner {
    /// Creates a signer keyed by `secret`.
    pub fn new(secret: impl AsRef<[u8]>) -> SessionResult<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_ref()).map_err(|_| SessionError::InvalidKey)?;
        Ok(Self { mac })
    }

    /// Appends a signature to `value`.
    #[must_use]
    pub fn sign(&self, value: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());
        format!("{value}.{signature}")
    }

    /// Returns the original value if the signature matches.
    ///
    /// The comparison is constant-time.
    pub fn unsign<'a>(&self, signed: &'a str) -> SessionResult<&'a str> {
        let (value, signature) = signed.rsplit_once('.').ok_or(SessionError::BadSignature)?;
        let signature = BASE64
            .decode(signature.trim_end_matches('='))
            .map_err(|_| SessionError::BadSignature)?;

        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;
        Ok(value)
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_then_unsign() {
        let signer = HmacSigner::new("keyboard cat").unwrap();
        let signed = signer.sign("hello");
        assert!(signed.starts_with("hello."));
        assert_eq!(signer.unsign(&signed).unwrap(), "hello");
    }

    #[test]
    fn test_matches_cookie_signature_layout() {
        // Reference output of `cookie-signature` for sign("hello", "tobiiscool")
        let signer = HmacSigner::new("tobiiscool").unwrap();
        assert_eq!(
            signer.sign("hello"),
            "hello.DGDUkGlIkCzPz+C0B064FNgHdEjox7ch8tOBGslZ5QI"
        );
    }

    #[test]
    fn test_value_may_contain_dots() {
        let signer = HmacSigner::new("secret").unwrap();
        let signed = signer.sign("a.b.c");
        assert_eq!(signer.unsign(&signed).unwrap(), "a.b.c");
    }

    #[test]
    fn test_tampered_value_is_rejected() {
        let signer = HmacSigner::new("secret").unwrap();
        let signed = signer.sign("alice@example.com");
        let tampered = signed.replacen("alice", "mallory", 1);
        assert!(matches!(signer.unsign(&tampered), Err(SessionError::BadSignature)));
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let signed = HmacSigner::new("one").unwrap().sign("value");
        let other = HmacSigner::new("two").unwrap();
        assert!(other.unsign(&signed).is_err());
    }

    #[test]
    fn test_missing_signature_is_rejected() {
        let signer = HmacSigner::new("secret").unwrap();
        assert!(signer.unsign("no-signature").is_err());
        assert!(signer.unsign("value.!!!").is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = HmacSigner::new("super-secret").unwrap();
        assert!(!format!("{signer:?}").contains("super-secret"));
    }
}
