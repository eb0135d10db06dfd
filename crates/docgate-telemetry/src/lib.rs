//! Logging setup for docgate.
//!
//! Every docgate crate logs through `tracing`:
//!
//! | Level   | Event                                                  |
//! |---------|--------------------------------------------------------|
//! | `trace` | route dispatch                                         |
//! | `debug` | ignored or expired session cookies                     |
//! | `info`  | session granted                                        |
//! | `warn`  | identity verification failed or domain not allowed     |
//!
//! This crate installs a subscriber for hosts that do not bring their own.
//!
//! # Example
//!
//! ```rust,ignore
//! use docgate_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> docgate_telemetry::TelemetryResult<()> {
//!     init_logging(&LogConfig::production())?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
