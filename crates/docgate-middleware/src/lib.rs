//! # Docgate Middleware
//!
//! Middleware composition and routing for docgate, independent of any host
//! web framework's router.
//!
//! This crate provides:
//!
//! - [`Middleware`]: the one handler contract, resolving to
//!   [`Outcome::Continue`], [`Outcome::Respond`], or an error
//! - [`Chain`]: an ordered, nestable list of middleware run as one; the
//!   first error or response stops it
//! - [`Router`]: routes keyed by optional method and optional exact path;
//!   every matching route runs, in registration order
//! - [`Mount`]: attaches a layer under a path prefix
//! - [`MiddlewareContext`]: request-scoped state threaded through a chain
//!
//! ## Dispatch
//!
//! ```text
//! Request → Mount("/api-docs") → Router ─┬─ use_all  [session]
//!                                        ├─ GET /auth [start]
//!                                        ├─ GET /auth/callback [finish]
//!                                        └─ use_all  [challenge]
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use docgate_middleware::{Chain, Layer, MiddlewareContext, PassThrough};
//!
//! let chain = Chain::new(vec![Layer::handler(PassThrough)]);
//! let mut ctx = MiddlewareContext::for_request(&request);
//!
//! match chain.run(&mut ctx, &request).await? {
//!     Outcome::Continue => { /* serve the protected content */ }
//!     Outcome::Respond(response) => return Ok(response),
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/docgate-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod context;
pub mod error;
pub mod middleware;
pub mod mount;
pub mod router;
pub mod types;

// Re-export main types at crate root
pub use chain::{BoxedMiddleware, Chain, Layer};
pub use context::MiddlewareContext;
pub use error::{BoxError, MiddlewareError};
pub use middleware::{BoxFuture, FnMiddleware, Middleware, MiddlewareResult, Outcome, PassThrough};
pub use mount::Mount;
pub use router::Router;
pub use types::{html_escape, Request, RequestExt, Response, ResponseExt};
