//! The OAuth gate.
//!
//! [`OAuthGate`] is a sub-router mounted in front of protected content:
//!
//! ```text
//! use_all            [session_authorizer]   sets the authorized flag
//! GET /auth          [oauth_start]          302 to the provider
//! GET /auth/callback [oauth_callback]       verify, mint cookie, 302 back
//! use_all            [oauth_challenge]      HTML page with a sign-in link
//! ```
//!
//! Every stage after the authorizer continues untouched once the flag is
//! set, so an authorized request falls through the gate to whatever the
//! host mounted after it.

use crate::error::{GateResult, VerifyError};
use crate::google::GoogleVerifier;
use crate::verifier::{CallbackParams, IdentityVerifier};
use docgate_config::GoogleOAuthConfig;
use docgate_middleware::{
    html_escape, BoxFuture, Layer, Middleware, MiddlewareContext, MiddlewareError,
    MiddlewareResult, Outcome, Request, RequestExt, Response, ResponseExt, Router,
};
use docgate_session::{Authorize, Clock, SessionAuthorizer, SystemClock};
use std::sync::Arc;

/// Path of the sign-in route, relative to the mount.
pub const AUTH_PATH: &str = "/auth";

/// Path of the provider callback route, relative to the mount.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Query flag set on the challenge redirect after a failed sign-in.
pub const FAILED_PARAM: &str = "failed";

/// Restricts a mount to identities from the allowed email domains.
///
/// # Example
///
/// ```
/// use docgate_config::GoogleOAuthConfig;
/// use docgate_oauth::OAuthGate;
///
/// let config = GoogleOAuthConfig::new("client-id", "client-secret", "cookie-secret")
///     .allowed_domain("example.com");
///
/// let gate = OAuthGate::new(&config).unwrap();
/// assert!(gate.is_enabled());
/// assert!(!OAuthGate::disabled().is_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct OAuthGate {
    inner: Option<Enabled>,
}

#[derive(Debug, Clone)]
struct Enabled {
    authorizer: SessionAuthorizer,
    router: Router,
}

impl OAuthGate {
    /// A gate that lets every request through without touching the flag.
    #[must_use]
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Builds a gate verifying against Google.
    pub fn new(config: &GoogleOAuthConfig) -> GateResult<Self> {
        Self::with_verifier(config, Arc::new(GoogleVerifier::from_config(config)))
    }

    /// Builds a gate when `config` is present, a disabled gate otherwise.
    pub fn from_config(config: Option<&GoogleOAuthConfig>) -> GateResult<Self> {
        config.map_or_else(|| Ok(Self::disabled()), Self::new)
    }

    /// Builds a gate around a custom verifier.
    pub fn with_verifier(
        config: &GoogleOAuthConfig,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> GateResult<Self> {
        Self::with_parts(config, verifier, Arc::new(SystemClock))
    }

    /// Builds a gate around a custom verifier and clock.
    pub fn with_parts(
        config: &GoogleOAuthConfig,
        verifier: Arc<dyn IdentityVerifier>,
        clock: Arc<dyn Clock>,
    ) -> GateResult<Self> {
        config.validate()?;

        let authorizer = SessionAuthorizer::with_clock(
            &config.cookie_secret,
            config.session_duration(),
            clock,
        )?;
        let allowed_domains: Arc<[String]> = config.allowed_domains.clone().into();

        let mut router = Router::new();
        router
            .use_all([Layer::handler(authorizer.clone())])
            .get(
                AUTH_PATH,
                [Layer::handler(StartAuth {
                    verifier: Arc::clone(&verifier),
                })],
            )
            .get(
                CALLBACK_PATH,
                [Layer::handler(FinishAuth {
                    verifier,
                    allowed_domains,
                })],
            )
            .use_all([Layer::handler(Challenge)]);

        tracing::debug!(
            domains = ?config.allowed_domains,
            session_secs = config.session_duration().as_secs(),
            "oauth gate enabled"
        );

        Ok(Self {
            inner: Some(Enabled { authorizer, router }),
        })
    }

    /// Returns true if the gate checks identities.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Returns the session authorizer the gate runs first, if enabled.
    #[must_use]
    pub fn authorizer(&self) -> Option<&SessionAuthorizer> {
        self.inner.as_ref().map(|enabled| &enabled.authorizer)
    }
}

impl Middleware for OAuthGate {
    fn name(&self) -> &'static str {
        "oauth_gate"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        match &self.inner {
            Some(enabled) => enabled.router.process(ctx, request),
            None => Box::pin(async { Ok(Outcome::Continue) }),
        }
    }
}

/// Builds `<protocol>://<host><mount>/auth/callback` for this request.
fn callback_url(
    middleware: &'static str,
    ctx: &MiddlewareContext,
    request: &Request,
) -> Result<String, MiddlewareError> {
    let host = request
        .host()
        .ok_or_else(|| MiddlewareError::failed(middleware, "request has no Host header"))?;
    Ok(format!(
        "{}://{}{}{}",
        request.protocol(),
        host,
        ctx.base_path(),
        CALLBACK_PATH
    ))
}

struct StartAuth {
    verifier: Arc<dyn IdentityVerifier>,
}

impl Middleware for StartAuth {
    fn name(&self) -> &'static str {
        "oauth_start"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            if ctx.is_authorized() {
                return Ok(Outcome::Continue);
            }

            let callback = callback_url(self.name(), ctx, request)?;
            let location = self
                .verifier
                .authorization_url(&callback)
                .map_err(|e| MiddlewareError::source(self.name(), e))?;

            tracing::debug!(provider = self.verifier.name(), callback = %callback, "redirecting to provider");
            Ok(Outcome::Respond(Response::redirect(&location)))
        })
    }
}

struct FinishAuth {
    verifier: Arc<dyn IdentityVerifier>,
    allowed_domains: Arc<[String]>,
}

impl FinishAuth {
    async fn identify(&self, callback: &str, request: &Request) -> Result<String, VerifyError> {
        let params = CallbackParams::from_request(request);
        let profile = self.verifier.verify(callback, &params).await?;
        profile
            .allowed_email(&self.allowed_domains)
            .map(ToString::to_string)
            .ok_or_else(|| {
                let emails: Vec<&str> = profile.emails.iter().map(|e| e.value.as_str()).collect();
                VerifyError::Rejected(format!(
                    "no verified email in an allowed domain: {}",
                    emails.join(", ")
                ))
            })
    }
}

impl Middleware for FinishAuth {
    fn name(&self) -> &'static str {
        "oauth_callback"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            if ctx.is_authorized() {
                return Ok(Outcome::Continue);
            }

            let callback = callback_url(self.name(), ctx, request)?;
            let identity = match self.identify(&callback, request).await {
                Ok(identity) => identity,
                Err(e) => {
                    tracing::warn!(
                        provider = self.verifier.name(),
                        error = %e,
                        "sign-in denied"
                    );
                    let location = format!("{}?{}=true", ctx.mount_root(), FAILED_PARAM);
                    return Ok(Outcome::Respond(Response::redirect(&location)));
                }
            };

            let authorize = ctx.get_extension::<Authorize>().cloned().ok_or_else(|| {
                MiddlewareError::failed(self.name(), "session authorizer did not run")
            })?;
            authorize
                .grant(ctx, &identity)
                .map_err(|e| MiddlewareError::source(self.name(), e))?;

            Ok(Outcome::Respond(Response::redirect(ctx.mount_root())))
        })
    }
}

struct Challenge;

impl Challenge {
    fn page(base_path: &str, failed: bool) -> String {
        let notice = if failed {
            r#"<p style="color: red; font-weight: bold;">Authentication failed</p>"#
        } else {
            ""
        };
        format!(
            r#"{notice}<p>You need to authenticate yourself</p><a href="{href}">Open Google OAuth</a>"#,
            href = html_escape(&format!("{base_path}{AUTH_PATH}"))
        )
    }
}

impl Middleware for Challenge {
    fn name(&self) -> &'static str {
        "oauth_challenge"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: &'a Request,
    ) -> BoxFuture<'a, MiddlewareResult> {
        Box::pin(async move {
            if ctx.is_authorized() {
                return Ok(Outcome::Continue);
            }

            let failed = request.query_param(FAILED_PARAM).as_deref() == Some("true");
            Ok(Outcome::Respond(Response::html(Self::page(
                ctx.base_path(),
                failed,
            ))))
        })
    }
}
