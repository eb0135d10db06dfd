//! # Docgate Session
//!
//! Signed session cookies for docgate.
//!
//! A successful sign-in mints the `api-docs-authorized` cookie holding
//! `{ identity, issuedAt }`, signed with HMAC-SHA256 under the deployment's
//! cookie secret. On every later request [`SessionAuthorizer`] verifies the
//! cookie and sets [`MiddlewareContext::is_authorized`] while
//! `now - issuedAt` stays under the session duration.
//!
//! A cookie that is missing, unsigned, tampered with, malformed or stale is
//! simply not an authorization; none of these is an error to the client.
//!
//! [`MiddlewareContext::is_authorized`]: docgate_middleware::MiddlewareContext::is_authorized

#![doc(html_root_url = "https://docs.rs/docgate-session/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod authorizer;
pub mod clock;
pub mod cookie;
pub mod error;
pub mod signer;
pub mod token;

pub use authorizer::{Authorize, SessionAuthorizer};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{SessionError, SessionResult};
pub use signer::HmacSigner;
pub use token::{SessionToken, COOKIE_NAME};
