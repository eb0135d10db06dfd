//! Mounting a layer under a path prefix.
//!
//! [`Mount`] lets a host attach a chain at an arbitrary prefix. While the
//! inner layer runs, the context reports the prefix as its
//! [`base_path`](MiddlewareContext::base_path) and the remainder as its
//! [`path`](MiddlewareContext::path), so the inner chain can build links and
//! redirects without knowing where it was mounted.

use crate::chain::{Chain, Layer};
use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, MiddlewareResult, Outcome};
use crate::types::Request;

/// A layer reachable only below a path prefix.
///
/// # Example
///
/// ```
/// use docgate_middleware::{Layer, Mount, PassThrough};
///
/// let mount = Mount::new("/api-docs/", Layer::handler(PassThrough));
/// assert_eq!(mount.prefix(), "/api-docs");
/// ```
#[derive(Debug, Clone)]
pub struct Mount {
    /// Normalized prefix: leading slash, no trailing slash, "" for the root.
    prefix: String,
    inner: Chain,
}

impl Mount {
    /// Mounts `inner` at `prefix`.
    pub fn new(prefix: impl AsRef<str>, inner: Layer) -> Self {
        let trimmed = prefix.as_ref().trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        Self {
            prefix,
            inner: Chain::new([inner]),
        }
    }

    /// Returns the normalized prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the path below the prefix, if `path` is inside the mount.
    fn strip<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.prefix.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(self.prefix.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}

impl Middleware for Mount {
    fn name(&self) -> &'static str {
        "mount"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            let relative = match self.strip(ctx.path()) {
                Some(rest) => rest.to_string(),
                None => return Ok(Outcome::Continue),
            };

            let base = format!("{}{}", ctx.base_path(), self.prefix);
            let (outer_base, outer_path) = ctx.enter(base, relative);
            let result = self.inner.run(ctx, request).await;
            ctx.enter(outer_base, outer_path);
            result
        })
    }
}
