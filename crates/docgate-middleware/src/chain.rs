//! Middleware composition.
//!
//! A [`Chain`] is an ordered tree of [`Layer`]s. Each layer is either a leaf
//! middleware or a nested chain; nesting is kept as an explicit tree and is
//! resolved recursively each time the chain runs.
//!
//! ```text
//! Chain[ a, Chain[ b, c ], d ]
//!
//! a ─Continue→ b ─Continue→ c ─Continue→ d ─Continue→ (caller proceeds)
//!              │
//!              └─Err(e)──────────────────────────────→ (caller receives e)
//! ```
//!
//! A layer that returns `Err` stops every later layer in its own chain and
//! in every enclosing chain. A layer that returns `Outcome::Respond` stops
//! the chain as well, and the response is handed back to the caller.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, MiddlewareResult, Outcome};
use crate::types::Request;
use std::fmt;
use std::sync::Arc;

/// A type-erased middleware that can be stored in a chain.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// One element of a [`Chain`].
#[derive(Clone)]
pub enum Layer {
    /// A leaf middleware.
    Handler(BoxedMiddleware),
    /// A nested chain, run in place.
    Chain(Chain),
}

impl Layer {
    /// Wraps a middleware as a leaf layer.
    pub fn handler<M: Middleware>(middleware: M) -> Self {
        Self::Handler(Arc::new(middleware))
    }

    /// Wraps an already shared middleware as a leaf layer.
    pub fn shared(middleware: BoxedMiddleware) -> Self {
        Self::Handler(middleware)
    }

    fn run<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        match self {
            Self::Handler(middleware) => middleware.process(ctx, request),
            Self::Chain(chain) => chain.run(ctx, request),
        }
    }
}

impl From<Chain> for Layer {
    fn from(chain: Chain) -> Self {
        Self::Chain(chain)
    }
}

impl From<Vec<Layer>> for Layer {
    fn from(layers: Vec<Layer>) -> Self {
        Self::Chain(Chain::new(layers))
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(middleware) => f.debug_tuple("Handler").field(&middleware.name()).finish(),
            Self::Chain(chain) => f.debug_tuple("Chain").field(chain).finish(),
        }
    }
}

/// An ordered, possibly nested list of middleware composed into one.
///
/// Cloning a chain is cheap; the layers are shared.
///
/// # Example
///
/// ```
/// use docgate_middleware::{Chain, Layer, PassThrough};
///
/// let chain = Chain::new(vec![
///     Layer::handler(PassThrough),
///     Layer::from(vec![Layer::handler(PassThrough), Layer::handler(PassThrough)]),
/// ]);
/// assert_eq!(chain.len(), 2);
/// assert_eq!(chain.leaf_count(), 3);
/// ```
#[derive(Clone)]
pub struct Chain {
    layers: Arc<[Layer]>,
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            layers: Arc::from(Vec::new()),
        }
    }
}

impl Chain {
    /// Composes the given layers, in order.
    pub fn new(layers: impl IntoIterator<Item = Layer>) -> Self {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    /// Creates a chain that proceeds immediately.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of top-level layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if the chain has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the number of leaf middleware across all nesting levels.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| match layer {
                Layer::Handler(_) => 1,
                Layer::Chain(chain) => chain.leaf_count(),
            })
            .sum()
    }

    /// Runs every layer in order until one answers or fails.
    ///
    /// Queued `Set-Cookie` headers in the context are moved onto a response
    /// produced anywhere inside the chain.
    pub fn run<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            for layer in self.layers.iter() {
                match layer.run(ctx, request).await? {
                    Outcome::Continue => {}
                    Outcome::Respond(mut response) => {
                        ctx.apply_set_cookies(&mut response);
                        return Ok(Outcome::Respond(response));
                    }
                }
            }
            Ok(Outcome::Continue)
        })
    }
}

impl Middleware for Chain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        self.run(ctx, request)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.layers.iter()).finish()
    }
}
