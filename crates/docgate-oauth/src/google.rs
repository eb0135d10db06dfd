//! Google OAuth 2.0 authorization-code verifier.
//!
//! The flow is the standard web-server one:
//!
//! 1. redirect the browser to Google's consent page with the `userinfo.email` scope
//! 2. exchange the returned code for an access token
//! 3. fetch the user's email and its verification state

use crate::error::{VerifyError, VerifyResult};
use crate::profile::Profile;
use crate::verifier::{CallbackParams, IdentityVerifier};
use async_trait::async_trait;
use docgate_config::GoogleOAuthConfig;
use serde::Deserialize;

/// Google's authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google's OpenID userinfo endpoint.
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// The only scope requested.
pub const EMAIL_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";

/// Provider endpoints, overridable for testing against a local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    /// Consent page.
    pub auth_url: String,
    /// Code exchange.
    pub token_url: String,
    /// Profile lookup.
    pub userinfo_url: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: Option<String>,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

impl From<UserInfo> for Profile {
    fn from(info: UserInfo) -> Self {
        let mut profile = info
            .email
            .map(|email| Self::with_email(email, info.email_verified))
            .unwrap_or_default();
        profile.id = info.sub;
        profile
    }
}

/// Verifies identities against Google.
#[derive(Debug, Clone)]
pub struct GoogleVerifier {
    client_id: String,
    client_secret: String,
    endpoints: GoogleEndpoints,
    http: reqwest::Client,
}

impl GoogleVerifier {
    /// Creates a verifier for the given OAuth client.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            endpoints: GoogleEndpoints::default(),
            http: reqwest::Client::new(),
        }
    }

    /// Creates a verifier from the gate configuration.
    #[must_use]
    pub fn from_config(config: &GoogleOAuthConfig) -> Self {
        Self::new(&config.google_client_id, &config.google_client_secret)
    }

    /// Replaces the provider endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    async fn exchange_code(&self, code: &str, callback_url: &str) -> VerifyResult<String> {
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", callback_url),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VerifyError::provider(status.as_u16(), body));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> VerifyResult<Profile> {
        let response = self
            .http
            .get(&self.endpoints.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VerifyError::provider(status.as_u16(), body));
        }

        let info: UserInfo = response.json().await?;
        Ok(info.into())
    }
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    fn name(&self) -> &'static str {
        "google"
    }

    fn authorization_url(&self, callback_url: &str) -> VerifyResult<String> {
        let query = serde_urlencoded::to_string([
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", callback_url),
            ("response_type", "code"),
            ("scope", EMAIL_SCOPE),
        ])
        .map_err(|e| VerifyError::InvalidRequest(format!("failed to encode query: {e}")))?;

        Ok(format!("{}?{query}", self.endpoints.auth_url))
    }

    async fn verify(&self, callback_url: &str, params: &CallbackParams) -> VerifyResult<Profile> {
        let code = params.require_code()?;
        let access_token = self.exchange_code(code, callback_url).await?;
        let profile = self.fetch_profile(&access_token).await?;
        tracing::debug!(
            emails = profile.emails.len(),
            subject = ?profile.id,
            "fetched google profile"
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url() {
        let verifier = GoogleVerifier::new("client-123", "secret");
        let url = verifier
            .authorization_url("https://docs.example.com/api-docs/auth/callback")
            .unwrap();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains(
            "redirect_uri=https%3A%2F%2Fdocs.example.com%2Fapi-docs%2Fauth%2Fcallback"
        ));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fuserinfo.email"));
        assert!(!url.contains("secret"));
    }

    #[test]
    fn test_userinfo_into_profile() {
        let info: UserInfo = serde_json::from_str(
            r#"{"sub":"42","email":"a@example.com","email_verified":true,"picture":"x"}"#,
        )
        .unwrap();
        let profile = Profile::from(info);
        assert_eq!(profile.id.as_deref(), Some("42"));
        assert_eq!(profile.emails[0].value, "a@example.com");
        assert!(profile.emails[0].verified);
    }

    #[test]
    fn test_userinfo_without_email() {
        let info: UserInfo = serde_json::from_str(r#"{"sub":"42"}"#).unwrap();
        let profile = Profile::from(info);
        assert!(profile.emails.is_empty());
    }

    #[tokio::test]
    async fn test_verify_fails_before_network_without_code() {
        let verifier = GoogleVerifier::new("id", "secret").with_endpoints(GoogleEndpoints {
            auth_url: "http://127.0.0.1:9/auth".to_string(),
            token_url: "http://127.0.0.1:9/token".to_string(),
            userinfo_url: "http://127.0.0.1:9/userinfo".to_string(),
        });
        let params = CallbackParams {
            code: None,
            error: Some("access_denied".to_string()),
        };
        assert!(matches!(
            verifier.verify("http://h/cb", &params).await,
            Err(VerifyError::Denied(_))
        ));
    }
}
