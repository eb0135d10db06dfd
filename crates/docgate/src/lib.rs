//! # Docgate
//!
//! **Swagger documentation for internal APIs, restricted to Google accounts
//! of chosen email domains.**
//!
//! Docgate collects Swagger 2.0 path and definition entries, serves them
//! through Swagger UI, and optionally puts the page behind Google OAuth:
//!
//! - 📚 **Document registry** – per-verb registration, duplicates rejected
//! - 🔒 **Domain gate** – only verified emails of allowed domains get in
//! - 🍪 **Stateless sessions** – a signed, time-stamped cookie carries access
//! - 📍 **Mountable** – every link and redirect follows the mount prefix
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docgate::prelude::*;
//! use serde_json::json;
//!
//! let docs = ApiDocs::new(
//!     Info::new("Pet Store", "1.0.0").description("API for my Pet Store"),
//!     Some(
//!         GoogleOAuthConfig::new(client_id, client_secret, cookie_secret)
//!             .allowed_domains(["example.com"]),
//!     ),
//! );
//!
//! docs.get("/pet/{id}", json!({ "description": "Retrieve a pet by ID" }))?;
//!
//! let app = Chain::new([Layer::handler(Mount::new(
//!     "/api-docs",
//!     Layer::handler(docs.handler()?),
//! ))]);
//! ```
//!
//! ## Request Flow
//!
//! ```text
//! Request → SessionAuthorizer → /auth          → Google consent screen
//!                             → /auth/callback → cookie + redirect to mount root
//!                             → (unauthorized) → sign-in page
//!                             → (authorized)   → Swagger UI / swagger.json
//! ```

#![doc(html_root_url = "https://docs.rs/docgate/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api_docs;
mod error;
mod handler;

pub use api_docs::ApiDocs;
pub use error::{Error, Result};
pub use handler::DocsHandler;

pub use docgate_config::{ConfigLoader, DocgateConfig, GoogleOAuthConfig, InfoConfig};
pub use docgate_docs::{definition_ref, ApiDocument, HttpVerb, Info, Schema, SchemaType};

// Re-export the component crates
pub use docgate_config as config;
pub use docgate_docs as docs;
pub use docgate_middleware as middleware;
pub use docgate_oauth as oauth;
pub use docgate_session as session;
pub use docgate_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use docgate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{ApiDocs, DocsHandler, Error, Result};

    pub use docgate_config::{ConfigLoader, DocgateConfig, GoogleOAuthConfig};
    pub use docgate_docs::{HttpVerb, Info, Schema};
    pub use docgate_middleware::{
        Chain, Layer, Middleware, MiddlewareContext, Mount, Outcome, Request, Response,
        ResponseExt, Router,
    };
    pub use docgate_oauth::{IdentityVerifier, Profile};
    pub use docgate_telemetry::{init_logging, LogConfig};
}
