//! Structured logging for docgate.
//!
//! The gate emits plain `tracing` events: `debug` for rejected cookies and
//! routing, `info` for granted sessions, `warn` for denied sign-ins. A host
//! with its own subscriber can ignore this module; [`init_logging`] is for
//! hosts that have none.
//!
//! # Example
//!
//! ```rust,ignore
//! use docgate_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(identity = "a@example.com", "session granted");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Targets lowered to `warn` unless the directive names them.
const NOISY_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g. "info", "docgate_oauth=debug,info").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to emit ANSI colors in the human-readable format.
    pub ansi: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Whether to quiet the HTTP client used for the provider round trip.
    pub quiet_dependencies: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            ansi: false,
            file_line_info: false,
            include_target: true,
            quiet_dependencies: true,
        }
    }
}

impl LogConfig {
    /// Human-readable, colored output at `debug`, gate events included.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            ansi: true,
            file_line_info: true,
            ..Self::default()
        }
    }

    /// JSON output at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Replaces the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// The directive actually installed: the configured level, followed by
    /// `warn` for noisy dependency targets the level does not mention.
    pub fn directive(&self) -> String {
        if !self.quiet_dependencies {
            return self.level.clone();
        }
        let quieted = NOISY_TARGETS
            .iter()
            .filter(|target| !mentions_target(&self.level, target))
            .map(|target| format!("{target}=warn"));
        std::iter::once(self.level.clone())
            .chain(quieted)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Builds the filter, letting `RUST_LOG` override the configured level.
    pub fn env_filter(&self) -> TelemetryResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => create_env_filter(&self.directive()),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = tracing_subscriber::fmt::layer()
            .with_file(self.file_line_info)
            .with_line_number(self.file_line_info)
            .with_target(self.include_target);
        if self.json_format {
            layer.json().boxed()
        } else {
            layer.with_ansi(self.ansi).boxed()
        }
    }
}

fn mentions_target(level: &str, target: &str) -> bool {
    level
        .split(',')
        .filter_map(|part| part.split_once('=').map(|(name, _)| name.trim()))
        .any(|name| name == target || name.starts_with(&format!("{target}::")))
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the level does not parse, and
/// `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = config.env_filter()?;
    tracing_subscriber::registry()
        .with(config.fmt_layer().with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Creates an env filter from a string.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter(format!("{filter}: {e}")))
}
