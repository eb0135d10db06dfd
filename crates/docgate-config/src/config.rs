//! Main configuration types.
//!
//! This module provides the top-level [`DocgateConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{GoogleOAuthConfig, InfoConfig, LogFormat, LoggingConfig};

/// Complete docgate configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use docgate_config::DocgateConfig;
///
/// let config = DocgateConfig::default();
/// assert!(config.google_oauth.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DocgateConfig {
    /// Document metadata.
    #[serde(default)]
    pub info: InfoConfig,

    /// Google OAuth gate. Absent leaves the docs open.
    #[serde(default)]
    pub google_oauth: Option<GoogleOAuthConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DocgateConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use docgate_config::{DocgateConfig, GoogleOAuthConfig};
    ///
    /// let config = DocgateConfig::builder()
    ///     .google_oauth(
    ///         GoogleOAuthConfig::new("id", "secret", "cookie").allowed_domain("example.com"),
    ///     )
    ///     .build();
    ///
    /// assert!(config.is_gated());
    /// ```
    #[must_use]
    pub fn builder() -> DocgateConfigBuilder {
        DocgateConfigBuilder::new()
    }

    /// Returns true if the docs are behind the OAuth gate.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        self.google_oauth.is_some()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The document title or version is empty
    /// - The OAuth section is present but incomplete
    /// - The log level is empty
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        if self.info.title.trim().is_empty() {
            return Err(crate::ConfigError::missing_field("info.title"));
        }
        if self.info.version.trim().is_empty() {
            return Err(crate::ConfigError::missing_field("info.version"));
        }

        if let Some(oauth) = &self.google_oauth {
            oauth.validate()?;
        }

        if self.logging.enabled && self.logging.level.trim().is_empty() {
            return Err(crate::ConfigError::missing_field("logging.level"));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Debug-level, human-readable logs with ANSI colors.
    ///
    /// # Example
    ///
    /// ```
    /// use docgate_config::DocgateConfig;
    ///
    /// let config = DocgateConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;
        config
    }

    /// Create a production configuration preset.
    ///
    /// Info-level JSON logs.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;
        config
    }
}

/// Builder for [`DocgateConfig`].
#[derive(Debug, Default)]
pub struct DocgateConfigBuilder {
    info: Option<InfoConfig>,
    google_oauth: Option<GoogleOAuthConfig>,
    logging: Option<LoggingConfig>,
}

impl DocgateConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document metadata.
    #[must_use]
    pub fn info(mut self, info: InfoConfig) -> Self {
        self.info = Some(info);
        self
    }

    /// Enable the OAuth gate.
    #[must_use]
    pub fn google_oauth(mut self, google_oauth: GoogleOAuthConfig) -> Self {
        self.google_oauth = Some(google_oauth);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> DocgateConfig {
        DocgateConfig {
            info: self.info.unwrap_or_default(),
            google_oauth: self.google_oauth,
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<DocgateConfig, crate::ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
