//! Core middleware trait and types.
//!
//! A middleware receives the request context and the request, and resolves
//! to one of three continuations:
//!
//! - `Ok(Outcome::Continue)`: proceed to the next layer
//! - `Ok(Outcome::Respond(response))`: the middleware answered the request;
//!   nothing after it runs
//! - `Err(error)`: abandon this chain and every enclosing chain, handing the
//!   error to the outermost caller
//!
//! # Example
//!
//! ```
//! use docgate_middleware::{BoxFuture, Middleware, MiddlewareContext, MiddlewareResult, Outcome, Request};
//!
//! struct Noop;
//!
//! impl Middleware for Noop {
//!     fn name(&self) -> &'static str {
//!         "noop"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         _ctx: &'a mut MiddlewareContext,
//!         _request: &'a Request,
//!     ) -> BoxFuture<'a, MiddlewareResult> {
//!         Box::pin(async { Ok(Outcome::Continue) })
//!     }
//! }
//! ```

use crate::context::MiddlewareContext;
use crate::error::MiddlewareError;
use crate::types::{Request, Response};
use std::future::Future;
use std::pin::Pin;

/// A boxed future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a middleware decided to do with the request.
#[derive(Debug)]
pub enum Outcome {
    /// Pass control to the next layer.
    Continue,
    /// The request is answered; the chain stops here.
    Respond(Response),
}

impl Outcome {
    /// Returns true if this outcome passes control onward.
    #[must_use]
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Returns the response, if the chain was answered.
    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Continue => None,
            Self::Respond(response) => Some(response),
        }
    }
}

/// Result of running a middleware or a chain.
pub type MiddlewareResult = Result<Outcome, MiddlewareError>;

/// The core middleware trait.
///
/// # Invariants
///
/// - A middleware that answers the request returns `Outcome::Respond`
/// - A middleware MUST NOT retry or swallow an error returned by a nested chain
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used for logging.
    fn name(&self) -> &'static str;

    /// Process the request through this middleware.
    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult>;
}

/// A middleware built from a closure.
///
/// # Example
///
/// ```
/// use docgate_middleware::{FnMiddleware, Outcome};
///
/// let flag = FnMiddleware::new("flag", |ctx, _req| {
///     Box::pin(async move {
///         ctx.set_authorized(true);
///         Ok(Outcome::Continue)
///     })
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub fn new(name: &'static str, func: F) -> Self
    where
        F: for<'a> Fn(&'a mut MiddlewareContext, &'a Request) -> BoxFuture<'a, MiddlewareResult>
            + Send
            + Sync
            + 'static,
    {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut MiddlewareContext, &'a Request) -> BoxFuture<'a, MiddlewareResult>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        (self.func)(ctx, request)
    }
}

/// A middleware that always proceeds.
///
/// Stands in for a disabled stage, such as the gate when no OAuth
/// configuration is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Middleware for PassThrough {
    fn name(&self) -> &'static str {
        "pass_through"
    }

    fn process<'a>(
        &'a self,
        _ctx: &'a mut MiddlewareContext,
        _request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async { Ok(Outcome::Continue) })
    }
}
