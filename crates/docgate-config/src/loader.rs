//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, DocgateConfig, LogFormat};

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables
///
/// # Example
///
/// ```no_run
/// use docgate_config::ConfigLoader;
///
/// # fn main() -> Result<(), docgate_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("docgate.toml")?
///     .with_env_prefix("DOCGATE")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: DocgateConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DocgateConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with default configuration values.
    ///
    /// This is called automatically by `new()`, but can be chained for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = DocgateConfig::default();
        self
    }

    /// Start with development preset configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use docgate_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = DocgateConfig::development();
        self
    }

    /// Start with production preset configuration.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = DocgateConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// Supports TOML (.toml) and JSON (.json) formats.
    /// The file format is determined by the file extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON
    /// - The file contains unknown fields (strict mode)
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from an optional file.
    ///
    /// If the file exists, loads it. If not, silently continues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string.
    ///
    /// `format` is "toml" or "json".
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use docgate_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [info]
    ///     title = "Billing API"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.info.title, "Billing API");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::unsupported_format(format)),
        };
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`.
    /// For example, with prefix "DOCGATE":
    /// - `DOCGATE__GOOGLE_OAUTH__GOOGLE_CLIENT_ID=...`
    /// - `DOCGATE__GOOGLE_OAUTH__ALLOWED_DOMAINS=example.com,example.org`
    /// - `DOCGATE__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file for environment variables.
    ///
    /// A missing `.env` file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::Dotenv(e)),
        }
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies environment variable overrides (if a prefix was set) and
    /// validates the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Environment variable parsing fails
    /// - Configuration validation fails
    pub fn load(mut self) -> Result<DocgateConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without validation.
    #[must_use]
    pub fn load_unvalidated(self) -> DocgateConfig {
        self.config
    }

    // Parse configuration file based on extension
    fn parse_file(content: &str, path: &Path) -> Result<DocgateConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::unsupported_format(
                extension.unwrap_or_else(|| path.display().to_string()),
            )),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        self.apply_env_vars(prefix, env::vars())
    }

    // Only `{prefix}__*` keys are ours; `{prefix}_HOME` and the like are left alone.
    fn apply_env_vars(
        &mut self,
        prefix: &str,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), ConfigError> {
        let scoped = format!("{prefix}__");
        let env_vars: BTreeMap<String, String> = vars
            .into_iter()
            .filter(|(k, _)| k.starts_with(&scoped))
            .collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            // Info section
            ["INFO", "TITLE"] => {
                self.config.info.title = value.to_string();
            }
            ["INFO", "VERSION"] => {
                self.config.info.version = value.to_string();
            }
            ["INFO", "DESCRIPTION"] => {
                self.config.info.description = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }

            // Google OAuth section; any key switches the gate on
            ["GOOGLE_OAUTH", field] => {
                let oauth = self.config.google_oauth.get_or_insert_with(Default::default);
                match *field {
                    "GOOGLE_CLIENT_ID" => oauth.google_client_id = value.to_string(),
                    "GOOGLE_CLIENT_SECRET" => oauth.google_client_secret = value.to_string(),
                    "COOKIE_SECRET" => oauth.cookie_secret = value.to_string(),
                    "ALLOWED_DOMAINS" => {
                        oauth.allowed_domains = value
                            .split(',')
                            .map(str::trim)
                            .filter(|d| !d.is_empty())
                            .map(str::to_string)
                            .collect();
                    }
                    "SESSION_DURATION_MS" => {
                        oauth.session_duration_ms = value
                            .parse()
                            .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
                    }
                    _ => {}
                }
            }

            // Logging section
            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "ANSI_ENABLED"] => {
                self.config.logging.ansi_enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            // Unknown key - ignore
            _ => {}
        }

        Ok(())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GATED_TOML: &str = r#"
        [info]
        title = "Billing API"
        version = "2.3.0"

        [google_oauth]
        google_client_id = "id.apps.googleusercontent.com"
        google_client_secret = "client-secret"
        allowed_domains = ["example.com"]
        cookie_secret = "cookie-secret"

        [logging]
        level = "debug"
        format = "pretty"
    "#;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert!(config.google_oauth.is_none());
    }

    #[test]
    fn test_loader_with_development() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_toml() {
        let config = ConfigLoader::new()
            .with_string(GATED_TOML, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.info.title, "Billing API");
        let oauth = config.google_oauth.unwrap();
        assert_eq!(oauth.allowed_domains, vec!["example.com"]);
        assert_eq!(oauth.session_duration_ms, 3_600_000);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"google_oauth": {
            "google_client_id": "id",
            "google_client_secret": "secret",
            "allowed_domains": ["example.com"],
            "session_duration_ms": 60000,
            "cookie_secret": "cookie"
        }}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.google_oauth.unwrap().session_duration_ms, 60_000);
    }

    #[test]
    fn test_loader_with_string_unsupported_format() {
        let result = ConfigLoader::new().with_string("", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_loader_incomplete_oauth_fails_validation() {
        let toml = r#"
            [google_oauth]
            google_client_id = "id"
            google_client_secret = "secret"
            allowed_domains = []
            cookie_secret = "cookie"
        "#;

        let result = ConfigLoader::new().with_string(toml, "toml").unwrap().load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(GATED_TOML.as_bytes()).unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.info.version, "2.3.0");
        assert!(config.is_gated());
    }

    #[test]
    fn test_loader_with_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"info": {"title": "From JSON"}}"#).unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.info.title, "From JSON");
    }

    #[test]
    fn test_loader_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let result = ConfigLoader::new().with_file(file.path());
        assert!(
            matches!(result, Err(ConfigError::UnsupportedFormat { ref format }) if format == "yaml")
        );
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/docgate.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/docgate.toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config, DocgateConfig::default());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));

        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));

        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    // Environment overrides are exercised through apply_env_var directly;
    // mutating the process environment needs unsafe on newer editions.

    #[test]
    fn test_apply_env_var_enables_gate() {
        let mut loader = ConfigLoader::new();
        for (key, value) in [
            ("TEST__GOOGLE_OAUTH__GOOGLE_CLIENT_ID", "id"),
            ("TEST__GOOGLE_OAUTH__GOOGLE_CLIENT_SECRET", "secret"),
            ("TEST__GOOGLE_OAUTH__COOKIE_SECRET", "cookie"),
            ("TEST__GOOGLE_OAUTH__ALLOWED_DOMAINS", "example.com, example.org,"),
            ("TEST__GOOGLE_OAUTH__SESSION_DURATION_MS", "1000"),
        ] {
            loader.apply_env_var(key, value, "TEST").unwrap();
        }

        let config = loader.load().unwrap();
        let oauth = config.google_oauth.unwrap();
        assert_eq!(oauth.google_client_id, "id");
        assert_eq!(oauth.allowed_domains, vec!["example.com", "example.org"]);
        assert_eq!(oauth.session_duration_ms, 1000);
    }

    #[test]
    fn test_apply_env_var_partial_gate_fails_validation() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__GOOGLE_OAUTH__GOOGLE_CLIENT_ID", "id", "TEST")
            .unwrap();
        assert!(loader.load().is_err());
    }

    #[test]
    fn test_apply_env_var_info_and_logging() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__INFO__TITLE", "Env API", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__LEVEL", "warn", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__FORMAT", "pretty", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__ANSI_ENABLED", "yes", "TEST").unwrap();

        assert_eq!(loader.config.info.title, "Env API");
        assert_eq!(loader.config.logging.level, "warn");
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);
        assert!(loader.config.logging.ansi_enabled);
    }

    #[test]
    fn test_apply_env_var_invalid_values() {
        let mut loader = ConfigLoader::new();
        assert!(loader
            .apply_env_var("TEST__GOOGLE_OAUTH__SESSION_DURATION_MS", "an hour", "TEST")
            .is_err());
        assert!(loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST").is_err());
        assert!(loader.apply_env_var("TEST__LOGGING__ENABLED", "maybe", "TEST").is_err());
    }

    #[test]
    fn test_env_vars_outside_the_prefix_scope_ignored() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_vars(
                "DOCGATE",
                [
                    ("DOCGATE_HOME".to_string(), "/opt/docgate".to_string()),
                    ("DOCGATE_URL".to_string(), "https://docs.example.com".to_string()),
                    ("DOCGATEWAY".to_string(), "on".to_string()),
                    ("PATH".to_string(), "/usr/bin".to_string()),
                    ("DOCGATE__INFO__TITLE".to_string(), "Env API".to_string()),
                ],
            )
            .unwrap();

        let config = loader.load().unwrap();
        assert_eq!(config.info.title, "Env API");
    }

    #[test]
    fn test_apply_env_var_unknown_key_ignored() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVER__PORT", "8080", "TEST").unwrap();
        assert_eq!(loader.config, DocgateConfig::default());
    }
}
