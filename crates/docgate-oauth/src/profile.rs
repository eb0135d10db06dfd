//! Identity profiles returned by a verifier.

use serde::{Deserialize, Serialize};

/// An email address as attested by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEmail {
    /// The address.
    pub value: String,
    /// Whether the provider confirmed the address.
    pub verified: bool,
}

/// The identity a verifier established.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Provider-specific subject id.
    #[serde(default)]
    pub id: Option<String>,
    /// Email addresses, in provider order.
    #[serde(default)]
    pub emails: Vec<ProfileEmail>,
}

impl Profile {
    /// Creates a profile with a single email.
    #[must_use]
    pub fn with_email(email: impl Into<String>, verified: bool) -> Self {
        Self {
            id: None,
            emails: vec![ProfileEmail {
                value: email.into(),
                verified,
            }],
        }
    }

    /// Returns the first verified email whose domain is allowed.
    ///
    /// # Example
    ///
    /// ```
    /// use docgate_oauth::Profile;
    ///
    /// let profile = Profile::with_email("a@example.com", true);
    /// let allowed = vec!["example.com".to_string()];
    /// assert_eq!(profile.allowed_email(&allowed), Some("a@example.com"));
    /// ```
    #[must_use]
    pub fn allowed_email(&self, allowed_domains: &[String]) -> Option<&str> {
        self.emails
            .iter()
            .filter(|email| email.verified)
            .map(|email| email.value.as_str())
            .find(|email| {
                email_domain(email)
                    .is_some_and(|domain| allowed_domains.iter().any(|allowed| allowed == domain))
            })
    }
}

/// Returns the part of `email` after its last `@`.
#[must_use]
pub fn email_domain(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain)
}
