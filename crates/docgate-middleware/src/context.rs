//! Middleware context types.
//!
//! The [`MiddlewareContext`] carries request-scoped state through a chain.
//! It plays the part of the mutable annotations a host framework would hang
//! off its request object: the mount prefix the request was dispatched
//! under, the authorized flag derived from the session cookie, `Set-Cookie`
//! headers queued for the eventual response, and typed extensions such as
//! the authorize capability.

use crate::types::{Request, Response};
use http::{header, HeaderValue};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Context that flows through a middleware chain.
///
/// # Example
///
/// ```
/// use docgate_middleware::context::MiddlewareContext;
///
/// let mut ctx = MiddlewareContext::with_path("/auth");
/// assert_eq!(ctx.path(), "/auth");
/// assert_eq!(ctx.base_path(), "");
/// assert_eq!(ctx.mount_root(), "/");
/// assert!(!ctx.is_authorized());
///
/// ctx.set_authorized(true);
/// assert!(ctx.is_authorized());
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    /// Prefix under which the current chain is mounted ("" at the root).
    base_path: String,

    /// Request path relative to `base_path`.
    path: String,

    /// Whether the caller holds a fresh session.
    authorized: bool,

    /// `Set-Cookie` values to attach to whichever response ends the chain.
    set_cookies: Vec<HeaderValue>,

    /// Type-erased extension data.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MiddlewareContext {
    /// Creates a context for a request dispatched at the root.
    #[must_use]
    pub fn for_request(request: &Request) -> Self {
        Self::with_path(request.uri().path())
    }

    /// Creates a root context with an explicit path.
    #[must_use]
    pub fn with_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            base_path: String::new(),
            path: if path.is_empty() { "/".to_string() } else { path },
            authorized: false,
            set_cookies: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the mount prefix of the current chain ("" at the root).
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the request path relative to [`base_path`](Self::base_path).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the URL of the mount root, never empty.
    #[must_use]
    pub fn mount_root(&self) -> &str {
        if self.base_path.is_empty() {
            "/"
        } else {
            &self.base_path
        }
    }

    /// Replaces the mount prefix and relative path, returning the previous pair.
    ///
    /// Used by [`Mount`](crate::mount::Mount) to scope a nested chain.
    pub fn enter(&mut self, base_path: String, path: String) -> (String, String) {
        let base = std::mem::replace(&mut self.base_path, base_path);
        let path = std::mem::replace(&mut self.path, path);
        (base, path)
    }

    /// Returns whether the request carries a fresh authorization.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Sets the authorized flag.
    ///
    /// This should only be called by the session authorizer.
    pub fn set_authorized(&mut self, authorized: bool) {
        self.authorized = authorized;
    }

    /// Queues a `Set-Cookie` header value for the response.
    pub fn queue_set_cookie(&mut self, value: HeaderValue) {
        self.set_cookies.push(value);
    }

    /// Returns the queued `Set-Cookie` values.
    #[must_use]
    pub fn pending_set_cookies(&self) -> &[HeaderValue] {
        &self.set_cookies
    }

    /// Moves every queued `Set-Cookie` value onto `response`.
    ///
    /// The queue is drained, so applying twice never duplicates a cookie.
    pub fn apply_set_cookies(&mut self, response: &mut Response) {
        for value in self.set_cookies.drain(..) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    /// Stores a typed extension value.
    ///
    /// # Example
    ///
    /// ```
    /// use docgate_middleware::context::MiddlewareContext;
    ///
    /// #[derive(Clone)]
    /// struct Visitor(&'static str);
    ///
    /// let mut ctx = MiddlewareContext::with_path("/");
    /// ctx.set_extension(Visitor("alice@example.com"));
    /// assert_eq!(ctx.get_extension::<Visitor>().unwrap().0, "alice@example.com");
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}
