//! Exact-path router.
//!
//! The [`Router`] keeps routes in registration order. On dispatch it keeps
//! every route whose method and path accept the request, composes their
//! handler chains into a single [`Chain`], and runs it. Several routes may
//! match the same request; all of them run, in the order they were added.
//!
//! Paths are compared as plain strings against the context's relative path
//! (see [`MiddlewareContext::path`]). There is no parameter or wildcard
//! syntax.
//!
//! # Example
//!
//! ```
//! use docgate_middleware::{Layer, PassThrough, Router};
//!
//! let mut router = Router::new();
//! router
//!     .use_all([Layer::handler(PassThrough)])
//!     .get("/auth", [Layer::handler(PassThrough)])
//!     .get("/auth/callback", [Layer::handler(PassThrough)]);
//!
//! assert_eq!(router.len(), 3);
//! ```

use crate::chain::{Chain, Layer};
use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, MiddlewareResult};
use crate::types::Request;
use http::Method;

/// A registered route.
#[derive(Debug, Clone)]
struct Route {
    /// `None` matches every method.
    method: Option<Method>,
    /// `None` matches every path.
    path: Option<String>,
    /// Handlers, composed at registration time.
    chain: Chain,
}

impl Route {
    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().map_or(true, |m| m == method)
            && self.path.as_deref().map_or(true, |p| p == path)
    }
}

/// A registrable, filterable collection of routes.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers handlers for an exact method and path.
    pub fn route(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handlers: impl IntoIterator<Item = Layer>,
    ) -> &mut Self {
        self.push(Some(method), Some(path.into()), handlers)
    }

    /// Registers GET handlers for a path.
    pub fn get(&mut self, path: impl Into<String>, handlers: impl IntoIterator<Item = Layer>) -> &mut Self {
        self.route(Method::GET, path, handlers)
    }

    /// Registers POST handlers for a path.
    pub fn post(&mut self, path: impl Into<String>, handlers: impl IntoIterator<Item = Layer>) -> &mut Self {
        self.route(Method::POST, path, handlers)
    }

    /// Registers PUT handlers for a path.
    pub fn put(&mut self, path: impl Into<String>, handlers: impl IntoIterator<Item = Layer>) -> &mut Self {
        self.route(Method::PUT, path, handlers)
    }

    /// Registers PATCH handlers for a path.
    pub fn patch(&mut self, path: impl Into<String>, handlers: impl IntoIterator<Item = Layer>) -> &mut Self {
        self.route(Method::PATCH, path, handlers)
    }

    /// Registers DELETE handlers for a path.
    pub fn delete(&mut self, path: impl Into<String>, handlers: impl IntoIterator<Item = Layer>) -> &mut Self {
        self.route(Method::DELETE, path, handlers)
    }

    /// Registers method-agnostic handlers for an exact path.
    pub fn use_at(
        &mut self,
        path: impl Into<String>,
        handlers: impl IntoIterator<Item = Layer>,
    ) -> &mut Self {
        self.push(None, Some(path.into()), handlers)
    }

    /// Registers handlers that run for every request reaching this router.
    pub fn use_all(&mut self, handlers: impl IntoIterator<Item = Layer>) -> &mut Self {
        self.push(None, None, handlers)
    }

    fn push(
        &mut self,
        method: Option<Method>,
        path: Option<String>,
        handlers: impl IntoIterator<Item = Layer>,
    ) -> &mut Self {
        self.routes.push(Route {
            method,
            path,
            chain: Chain::new(handlers),
        });
        self
    }

    /// Composes the routes accepting `method` and `path`, in registration order.
    #[must_use]
    pub fn matching(&self, method: &Method, path: &str) -> Chain {
        Chain::new(
            self.routes
                .iter()
                .filter(|route| route.matches(method, path))
                .map(|route| Layer::Chain(route.chain.clone())),
        )
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Middleware for Router {
    fn name(&self) -> &'static str {
        "router"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            let chain = self.matching(request.method(), ctx.path());
            tracing::trace!(
                method = %request.method(),
                path = %ctx.path(),
                matched = chain.len(),
                "dispatching routes"
            );
            chain.run(ctx, request).await
        })
    }
}
