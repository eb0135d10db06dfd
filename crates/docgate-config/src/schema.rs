//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use docgate_telemetry::LogConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ConfigError;

/// Default session duration: one hour.
pub const DEFAULT_SESSION_DURATION_MS: u64 = 3_600_000;

/// Document metadata shown at the top of the docs page.
///
/// # Example
///
/// ```
/// use docgate_config::InfoConfig;
///
/// let info = InfoConfig::default();
/// assert_eq!(info.version, "1.0.0");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InfoConfig {
    /// API title.
    #[serde(default = "default_title")]
    pub title: String,

    /// API version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Longer description, rendered under the title.
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            description: None,
        }
    }
}

fn default_title() -> String {
    "Internal API".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Google OAuth settings. Present means the docs are gated.
///
/// The camelCase aliases accept configuration files written for the
/// Express middleware this gate replaces.
///
/// # Example
///
/// ```
/// use docgate_config::GoogleOAuthConfig;
/// use std::time::Duration;
///
/// let config = GoogleOAuthConfig::new("client-id", "client-secret", "cookie-secret")
///     .allowed_domain("example.com");
///
/// assert_eq!(config.session_duration(), Duration::from_secs(3600));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GoogleOAuthConfig {
    /// OAuth client id issued by Google.
    #[serde(alias = "googleClientId")]
    pub google_client_id: String,

    /// OAuth client secret issued by Google.
    #[serde(alias = "googleClientSecret")]
    pub google_client_secret: String,

    /// Email domains whose verified members may read the docs.
    #[serde(alias = "allowedDomains")]
    pub allowed_domains: Vec<String>,

    /// How long a session cookie is honored, in milliseconds.
    #[serde(default = "default_session_duration_ms", alias = "sessionDuration")]
    pub session_duration_ms: u64,

    /// Secret used to sign the session cookie.
    #[serde(alias = "cookieSecret")]
    pub cookie_secret: String,
}

impl Default for GoogleOAuthConfig {
    fn default() -> Self {
        Self {
            google_client_id: String::new(),
            google_client_secret: String::new(),
            allowed_domains: Vec::new(),
            session_duration_ms: DEFAULT_SESSION_DURATION_MS,
            cookie_secret: String::new(),
        }
    }
}

fn default_session_duration_ms() -> u64 {
    DEFAULT_SESSION_DURATION_MS
}

impl GoogleOAuthConfig {
    /// Creates a configuration with no allowed domains and the default
    /// session duration.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        cookie_secret: impl Into<String>,
    ) -> Self {
        Self {
            google_client_id: client_id.into(),
            google_client_secret: client_secret.into(),
            cookie_secret: cookie_secret.into(),
            ..Self::default()
        }
    }

    /// Adds an allowed email domain.
    #[must_use]
    pub fn allowed_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_domains.push(domain.into());
        self
    }

    /// Replaces the allowed email domains.
    #[must_use]
    pub fn allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the session duration. Sub-millisecond precision is dropped.
    #[must_use]
    pub fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Returns the session duration.
    #[must_use]
    pub fn session_duration(&self) -> Duration {
        Duration::from_millis(self.session_duration_ms)
    }

    /// Validate the section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a credential or the cookie secret is empty,
    /// no domain is allowed, or the session duration is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("google_oauth.google_client_id", &self.google_client_id),
            ("google_oauth.google_client_secret", &self.google_client_secret),
            ("google_oauth.cookie_secret", &self.cookie_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::missing_field(field));
            }
        }

        if self.allowed_domains.is_empty() {
            return Err(ConfigError::invalid_value(
                "google_oauth.allowed_domains",
                "at least one domain is required",
            ));
        }

        if let Some(domain) = self
            .allowed_domains
            .iter()
            .find(|d| d.is_empty() || d.contains('@'))
        {
            return Err(ConfigError::invalid_value(
                "google_oauth.allowed_domains",
                format!("not a bare domain: '{domain}'"),
            ));
        }

        if self.session_duration_ms == 0 {
            return Err(ConfigError::invalid_value(
                "google_oauth.session_duration_ms",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level (trace, debug, info, warn, error) or a filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            json_format: config.format == LogFormat::Json,
            ansi: config.ansi_enabled,
            file_line_info: config.include_location,
            include_target: true,
            quiet_dependencies: true,
        }
    }
}
