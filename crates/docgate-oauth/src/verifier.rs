//! The identity verifier seam.
//!
//! The gate never talks to an identity provider directly. It asks an
//! [`IdentityVerifier`] for the URL to send the browser to, and later hands
//! it the callback parameters to turn into a [`Profile`]. [`GoogleVerifier`]
//! is the production implementation; [`StaticVerifier`] answers from memory.
//!
//! [`GoogleVerifier`]: crate::GoogleVerifier

use crate::error::{VerifyError, VerifyResult};
use crate::profile::Profile;
use async_trait::async_trait;
use docgate_middleware::{Request, RequestExt};
use parking_lot::Mutex;

/// Query parameters the provider sends back to the callback route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code to exchange.
    pub code: Option<String>,
    /// Error code, set when the user declined or the provider failed.
    pub error: Option<String>,
}

impl CallbackParams {
    /// Reads `code` and `error` from the request's query string.
    #[must_use]
    pub fn from_request(request: &Request) -> Self {
        Self {
            code: request.query_param("code").filter(|c| !c.is_empty()),
            error: request.query_param("error").filter(|e| !e.is_empty()),
        }
    }

    /// Returns the code, or the reason there is none.
    pub fn require_code(&self) -> VerifyResult<&str> {
        if let Some(error) = &self.error {
            return Err(VerifyError::Denied(error.clone()));
        }
        self.code.as_deref().ok_or(VerifyError::MissingCode)
    }
}

/// Turns a provider round trip into a verified profile.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the provider URL that starts a sign-in returning to `callback_url`.
    fn authorization_url(&self, callback_url: &str) -> VerifyResult<String>;

    /// Completes a sign-in from the parameters delivered to `callback_url`.
    async fn verify(&self, callback_url: &str, params: &CallbackParams) -> VerifyResult<Profile>;
}

/// Verifier with a fixed answer.
///
/// Useful for tests and local development. It still enforces the callback
/// contract: an `error` parameter or a missing code fails verification.
///
/// # Example
///
/// ```
/// use docgate_oauth::{IdentityVerifier, Profile, StaticVerifier};
///
/// let verifier = StaticVerifier::returning(Profile::with_email("a@example.com", true));
/// let url = verifier.authorization_url("http://localhost/auth/callback").unwrap();
/// assert!(url.starts_with("https://provider.invalid/authorize?"));
/// ```
#[derive(Debug)]
pub struct StaticVerifier {
    profile: Option<Profile>,
    last_callback: Mutex<Option<String>>,
}

impl StaticVerifier {
    /// Verifies every callback as `profile`.
    #[must_use]
    pub fn returning(profile: Profile) -> Self {
        Self {
            profile: Some(profile),
            last_callback: Mutex::new(None),
        }
    }

    /// Rejects every callback.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            profile: None,
            last_callback: Mutex::new(None),
        }
    }

    /// Returns the callback URL of the most recent call.
    #[must_use]
    pub fn last_callback(&self) -> Option<String> {
        self.last_callback.lock().clone()
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    fn name(&self) -> &'static str {
        "static"
    }

    fn authorization_url(&self, callback_url: &str) -> VerifyResult<String> {
        *self.last_callback.lock() = Some(callback_url.to_string());
        let query = serde_urlencoded::to_string([("redirect_uri", callback_url)])
            .map_err(|e| VerifyError::InvalidRequest(e.to_string()))?;
        Ok(format!("https://provider.invalid/authorize?{query}"))
    }

    async fn verify(&self, callback_url: &str, params: &CallbackParams) -> VerifyResult<Profile> {
        *self.last_callback.lock() = Some(callback_url.to_string());
        params.require_code()?;
        self.profile
            .clone()
            .ok_or_else(|| VerifyError::Rejected("static verifier configured to fail".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;

    fn request(uri: &str) -> Request {
        http::Request::builder()
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_params_from_request() {
        let params = CallbackParams::from_request(&request("/auth/callback?code=4%2Fabc&state=x"));
        assert_eq!(params.code.as_deref(), Some("4/abc"));
        assert_eq!(params.error, None);
        assert_eq!(params.require_code().unwrap(), "4/abc");
    }

    #[test]
    fn test_error_param_wins_over_code() {
        let params = CallbackParams::from_request(&request("/cb?code=abc&error=access_denied"));
        assert!(matches!(params.require_code(), Err(VerifyError::Denied(e)) if e == "access_denied"));
    }

    #[test]
    fn test_missing_code() {
        let params = CallbackParams::from_request(&request("/cb?code="));
        assert!(matches!(params.require_code(), Err(VerifyError::MissingCode)));
    }

    #[tokio::test]
    async fn test_static_verifier_returns_profile() {
        let verifier = StaticVerifier::returning(Profile::with_email("a@example.com", true));
        let params = CallbackParams {
            code: Some("abc".to_string()),
            error: None,
        };

        let profile = verifier.verify("http://h/cb", &params).await.unwrap();
        assert_eq!(profile.emails[0].value, "a@example.com");
        assert_eq!(verifier.last_callback().as_deref(), Some("http://h/cb"));
    }

    #[tokio::test]
    async fn test_static_verifier_still_needs_code() {
        let verifier = StaticVerifier::returning(Profile::with_email("a@example.com", true));
        let result = verifier.verify("http://h/cb", &CallbackParams::default()).await;
        assert!(matches!(result, Err(VerifyError::MissingCode)));
    }

    #[tokio::test]
    async fn test_failing_verifier() {
        let verifier = StaticVerifier::failing();
        let params = CallbackParams {
            code: Some("abc".to_string()),
            error: None,
        };
        assert!(matches!(
            verifier.verify("http://h/cb", &params).await,
            Err(VerifyError::Rejected(_))
        ));
    }
}
