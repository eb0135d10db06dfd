//! Middleware serving the documentation.

use docgate_docs::{ApiDocument, SwaggerUi};
use docgate_middleware::{
    BoxFuture, Chain, Layer, Middleware, MiddlewareContext, MiddlewareResult, Request,
};
use docgate_oauth::OAuthGate;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// The gate followed by Swagger UI, built by
/// [`ApiDocs::handler`](crate::ApiDocs::handler).
///
/// The Swagger UI layer is assembled on the first request from a snapshot
/// of the document; clones share that snapshot.
#[derive(Clone)]
pub struct DocsHandler {
    gate: OAuthGate,
    document: Arc<RwLock<ApiDocument>>,
    chain: Arc<OnceLock<Chain>>,
}

impl DocsHandler {
    pub(crate) fn new(gate: OAuthGate, document: Arc<RwLock<ApiDocument>>) -> Self {
        Self {
            gate,
            document,
            chain: Arc::new(OnceLock::new()),
        }
    }

    /// Returns true if requests must sign in before seeing the docs.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        self.gate.is_enabled()
    }

    fn chain(&self) -> &Chain {
        self.chain.get_or_init(|| {
            let ui = SwaggerUi::new(&self.document.read());
            tracing::debug!(
                operations = ui.document().operation_count(),
                definitions = ui.document().definitions.len(),
                gated = self.gate.is_enabled(),
                "api docs assembled"
            );
            Chain::new([Layer::handler(self.gate.clone()), Layer::handler(ui)])
        })
    }
}

impl Middleware for DocsHandler {
    fn name(&self) -> &'static str {
        "api_docs"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        self.chain().run(ctx, request)
    }
}

impl fmt::Debug for DocsHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocsHandler")
            .field("gate", &self.gate)
            .field("assembled", &self.chain.get().is_some())
            .finish()
    }
}
