//! The session authorizer middleware.
//!
//! [`SessionAuthorizer`] runs on every request. It reads the
//! `api-docs-authorized` cookie, sets the context's authorized flag when the
//! cookie verifies and is still fresh, and leaves an [`Authorize`]
//! capability in the context for later handlers to mint a new cookie. It
//! never blocks a request.

use crate::clock::{Clock, SystemClock};
use crate::cookie::{Cookies, SameSite, SetCookie};
use crate::error::SessionResult;
use crate::signer::HmacSigner;
use crate::token::{SessionToken, COOKIE_NAME};
use docgate_middleware::{
    BoxFuture, Middleware, MiddlewareContext, MiddlewareResult, Outcome, Request, RequestExt,
};
use std::sync::Arc;
use std::time::Duration;

/// State shared by the authorizer and every capability it hands out.
#[derive(Debug)]
struct Shared {
    signer: HmacSigner,
    duration: Duration,
    clock: Arc<dyn Clock>,
}

/// Derives the authorized flag from the session cookie.
///
/// # Example
///
/// ```
/// use docgate_session::SessionAuthorizer;
/// use std::time::Duration;
///
/// let authorizer = SessionAuthorizer::new("cookie-secret", Duration::from_secs(3600)).unwrap();
/// assert_eq!(authorizer.session_duration(), Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct SessionAuthorizer {
    shared: Arc<Shared>,
}

impl SessionAuthorizer {
    /// Creates an authorizer using the system clock.
    pub fn new(cookie_secret: impl AsRef<[u8]>, session_duration: Duration) -> SessionResult<Self> {
        Self::with_clock(cookie_secret, session_duration, Arc::new(SystemClock))
    }

    /// Creates an authorizer reading time from `clock`.
    pub fn with_clock(
        cookie_secret: impl AsRef<[u8]>,
        session_duration: Duration,
        clock: Arc<dyn Clock>,
    ) -> SessionResult<Self> {
        Ok(Self {
            shared: Arc::new(Shared {
                signer: HmacSigner::new(cookie_secret)?,
                duration: session_duration,
                clock,
            }),
        })
    }

    /// Returns how long a minted cookie is honored.
    #[must_use]
    pub fn session_duration(&self) -> Duration {
        self.shared.duration
    }

    /// Decides whether `request` carries a fresh session.
    ///
    /// Returns the verified identity when it does.
    #[must_use]
    pub fn authorized_identity(&self, request: &Request) -> Option<String> {
        let cookies = Cookies::from_headers(request.headers());
        let raw = cookies.get(COOKIE_NAME)?;

        let token = match SessionToken::decode(raw, &self.shared.signer) {
            Ok(token) => token,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring session cookie");
                return None;
            }
        };

        if token.is_fresh(self.shared.clock.now(), self.shared.duration) {
            Some(token.identity)
        } else {
            tracing::debug!(identity = %token.identity, "session cookie expired");
            None
        }
    }
}

impl Middleware for SessionAuthorizer {
    fn name(&self) -> &'static str {
        "session_authorizer"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            let identity = self.authorized_identity(request);
            ctx.set_authorized(identity.is_some());
            ctx.set_extension(Authorize {
                shared: Arc::clone(&self.shared),
                secure: request.protocol() == "https",
                path: ctx.mount_root().to_string(),
            });
            Ok(Outcome::Continue)
        })
    }
}

/// Capability to mint a fresh session cookie for the current request.
///
/// Placed in the [`MiddlewareContext`] by [`SessionAuthorizer`]. The cookie
/// is scoped to the mount root the authorizer ran under.
///
/// ```rust,ignore
/// if let Some(authorize) = ctx.get_extension::<Authorize>().cloned() {
///     authorize.grant(ctx, "alice@example.com")?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authorize {
    shared: Arc<Shared>,
    secure: bool,
    path: String,
}

impl Authorize {
    /// Builds the cookie for `identity`, stamped with the current time.
    pub fn cookie(&self, identity: &str) -> SessionResult<SetCookie> {
        let token = SessionToken::new(identity, self.shared.clock.now());
        let value = token.encode(&self.shared.signer)?;
        Ok(SetCookie::new(COOKIE_NAME, value)
            .path(self.path.clone())
            .max_age(self.shared.duration)
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax))
    }

    /// Queues the cookie for `identity` on the eventual response.
    pub fn grant(&self, ctx: &mut MiddlewareContext, identity: &str) -> SessionResult<()> {
        let header = self.cookie(identity)?.to_header()?;
        ctx.queue_set_cookie(header);
        tracing::info!(identity = %identity, path = %self.path, "session granted");
        Ok(())
    }
}
