//! The documentation registry a host application fills and serves.

use crate::error::Result;
use crate::handler::DocsHandler;
use docgate_config::{DocgateConfig, GoogleOAuthConfig, InfoConfig};
use docgate_docs::{ApiDocument, HttpVerb, Info};
use docgate_middleware::{Layer, PassThrough};
use docgate_oauth::{GoogleVerifier, IdentityVerifier, OAuthGate};
use docgate_session::{Clock, SessionAuthorizer, SystemClock};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Swagger documentation for an internal API, optionally behind Google OAuth.
///
/// Paths and definitions are registered on the `ApiDocs`; [`handler`] turns
/// it into middleware serving Swagger UI, gated when an OAuth configuration
/// was given.
///
/// [`handler`]: Self::handler
///
/// # Example
///
/// ```
/// use docgate::{ApiDocs, Info};
/// use serde_json::json;
///
/// let docs = ApiDocs::new(Info::new("Pet Store", "1.0.0"), None);
///
/// let pet = docs
///     .definition("Pet", json!({ "type": "object" }))
///     .unwrap();
/// docs.get(
///     "/pet",
///     json!({ "responses": { "200": { "schema": { "type": "array", "items": { "$ref": pet } } } } }),
/// )
/// .unwrap();
///
/// assert!(docs.post("/pet", json!({})).is_ok());
/// assert!(docs.get("/pet", json!({})).is_err());
/// ```
#[derive(Clone)]
pub struct ApiDocs {
    document: Arc<RwLock<ApiDocument>>,
    oauth: Option<GoogleOAuthConfig>,
    verifier: Option<Arc<dyn IdentityVerifier>>,
    clock: Arc<dyn Clock>,
}

impl ApiDocs {
    /// Creates an empty registry. `oauth` gates the served docs when present.
    #[must_use]
    pub fn new(info: Info, oauth: Option<GoogleOAuthConfig>) -> Self {
        Self {
            document: Arc::new(RwLock::new(ApiDocument::new(info))),
            oauth,
            verifier: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Creates a registry from loaded configuration.
    #[must_use]
    pub fn from_config(config: &DocgateConfig) -> Self {
        Self::new(info_from(&config.info), config.google_oauth.clone())
    }

    /// Verifies identities with `verifier` instead of Google.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Reads session time from `clock`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns true if the served docs require sign-in.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        self.oauth.is_some()
    }

    /// Documents a GET operation.
    pub fn get(&self, path: impl Into<String>, operation: impl Serialize) -> Result<()> {
        self.path(HttpVerb::Get, path, operation)
    }

    /// Documents a POST operation.
    pub fn post(&self, path: impl Into<String>, operation: impl Serialize) -> Result<()> {
        self.path(HttpVerb::Post, path, operation)
    }

    /// Documents a PUT operation.
    pub fn put(&self, path: impl Into<String>, operation: impl Serialize) -> Result<()> {
        self.path(HttpVerb::Put, path, operation)
    }

    /// Documents a PATCH operation.
    pub fn patch(&self, path: impl Into<String>, operation: impl Serialize) -> Result<()> {
        self.path(HttpVerb::Patch, path, operation)
    }

    /// Documents a DELETE operation.
    pub fn delete(&self, path: impl Into<String>, operation: impl Serialize) -> Result<()> {
        self.path(HttpVerb::Delete, path, operation)
    }

    /// Documents an operation for any verb.
    pub fn path(
        &self,
        verb: HttpVerb,
        path: impl Into<String>,
        operation: impl Serialize,
    ) -> Result<()> {
        let operation = serde_json::to_value(operation)?;
        self.document.write().add_path(verb, path, operation)?;
        Ok(())
    }

    /// Registers a named schema and returns the `$ref` pointing at it.
    pub fn definition(&self, name: impl Into<String>, schema: impl Serialize) -> Result<String> {
        let schema = serde_json::to_value(schema)?;
        Ok(self.document.write().add_definition(name, schema)?)
    }

    /// Returns a copy of the document as registered so far.
    #[must_use]
    pub fn document(&self) -> ApiDocument {
        self.document.read().clone()
    }

    /// Builds the middleware serving the docs.
    ///
    /// The document is captured on the handler's first request, so paths
    /// registered between this call and that request are served. Fails if
    /// the OAuth configuration is incomplete.
    pub fn handler(&self) -> Result<DocsHandler> {
        let gate = match &self.oauth {
            None => OAuthGate::disabled(),
            Some(config) => {
                OAuthGate::with_parts(config, self.verifier_for(config), Arc::clone(&self.clock))?
            }
        };
        Ok(DocsHandler::new(gate, Arc::clone(&self.document)))
    }

    /// Builds middleware that only derives the authorized flag.
    ///
    /// It never answers a request, so a host can place it in front of its
    /// own routes and read [`is_authorized`] to serve docs users
    /// differently. Without OAuth configuration it passes every request
    /// through and leaves the flag unset.
    ///
    /// [`is_authorized`]: docgate_middleware::MiddlewareContext::is_authorized
    pub fn authorization_middleware(&self) -> Result<Layer> {
        let Some(config) = &self.oauth else {
            return Ok(Layer::handler(PassThrough));
        };
        config.validate()?;
        let authorizer = SessionAuthorizer::with_clock(
            &config.cookie_secret,
            config.session_duration(),
            Arc::clone(&self.clock),
        )?;
        Ok(Layer::handler(authorizer))
    }

    fn verifier_for(&self, config: &GoogleOAuthConfig) -> Arc<dyn IdentityVerifier> {
        match &self.verifier {
            Some(verifier) => Arc::clone(verifier),
            None => Arc::new(GoogleVerifier::from_config(config)),
        }
    }
}

impl fmt::Debug for ApiDocs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiDocs")
            .field("document", &self.document)
            .field("oauth", &self.oauth)
            .field("verifier", &self.verifier.as_ref().map(|v| v.name()))
            .field("clock", &self.clock)
            .finish()
    }
}

fn info_from(config: &InfoConfig) -> Info {
    let info = Info::new(&config.title, &config.version);
    match &config.description {
        Some(description) => info.description(description),
        None => info,
    }
}
