//! # Docgate Docs
//!
//! The documentation surface docgate protects.
//!
//! This crate provides:
//! - **[`ApiDocument`]**: a Swagger 2.0 document built one registration at a
//!   time, refusing a second registration of the same verb and path or the
//!   same definition name
//! - **[`Schema`]**: a typed builder for definition schemas
//! - **[`SwaggerUi`]**: middleware serving the interactive page and the raw
//!   `swagger.json`
//!
//! ## Quick Start
//!
//! ```rust
//! use docgate_docs::{ApiDocument, HttpVerb, Info, Schema, SwaggerUi};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), docgate_docs::DocsError> {
//! let mut doc = ApiDocument::new(Info::new("Pets", "1.0.0"));
//!
//! let pet = doc.add_definition(
//!     "Pet",
//!     Schema::object().property("name", Schema::string()).to_value()?,
//! )?;
//! doc.add_path(
//!     HttpVerb::Get,
//!     "/pets",
//!     json!({ "responses": { "200": { "schema": { "$ref": pet } } } }),
//! )?;
//!
//! let swagger = SwaggerUi::new(&doc);
//! assert!(swagger.html()?.contains("#/definitions/Pet"));
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod schema;
mod swagger;

pub use document::{
    definition_ref, ApiDocument, Contact, HttpVerb, Info, License, SWAGGER_VERSION,
};
pub use error::{DocsError, DocsResult};
pub use schema::{Schema, SchemaType};
pub use swagger::{DocExpansion, SwaggerUi, SPEC_PATH};
