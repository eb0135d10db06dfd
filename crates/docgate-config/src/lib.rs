//! Typed configuration for docgate.
//!
//! This crate provides a strongly-typed configuration with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`DocgateConfig`] holds three sections:
//!
//! - [`InfoConfig`] - title, version and description of the API document
//! - [`GoogleOAuthConfig`] - the OAuth gate; leaving it out serves the docs
//!   to everyone
//! - [`LoggingConfig`] - log level and format
//!
//! # Example
//!
//! ```no_run
//! use docgate_config::{ConfigLoader, DocgateConfig};
//!
//! # fn main() -> Result<(), docgate_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("docgate.toml")?
//!     .with_env_prefix("DOCGATE")
//!     .load()?;
//!
//! if config.is_gated() {
//!     println!("docs require a Google sign-in");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [info]
//! title = "Billing API"
//! version = "2.3.0"
//!
//! [google_oauth]
//! google_client_id = "1234.apps.googleusercontent.com"
//! google_client_secret = "..."
//! allowed_domains = ["example.com"]
//! session_duration_ms = 3600000
//! cookie_secret = "..."
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`. For example:
//!
//! - `DOCGATE__GOOGLE_OAUTH__COOKIE_SECRET=...`
//! - `DOCGATE__GOOGLE_OAUTH__ALLOWED_DOMAINS=example.com,example.org`
//! - `DOCGATE__LOGGING__LEVEL=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
