//! # Docgate OAuth
//!
//! Restricts a docgate mount to people who can prove, through Google, that
//! they own a verified email address in one of the allowed domains.
//!
//! - [`OAuthGate`]: the sub-router serving `/auth` and `/auth/callback` and
//!   answering every other unauthorized request with a challenge page
//! - [`IdentityVerifier`]: the provider seam, with [`GoogleVerifier`] for
//!   production and [`StaticVerifier`] for tests
//! - [`Profile`]: the verified emails a provider returned
//!
//! A successful sign-in is remembered by the signed session cookie from
//! [`docgate_session`]; the gate itself keeps no state between requests.

#![doc(html_root_url = "https://docs.rs/docgate-oauth/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod gate;
pub mod google;
pub mod profile;
pub mod verifier;

pub use error::{GateError, GateResult, VerifyError, VerifyResult};
pub use gate::{OAuthGate, AUTH_PATH, CALLBACK_PATH, FAILED_PARAM};
pub use google::{GoogleEndpoints, GoogleVerifier, EMAIL_SCOPE};
pub use profile::{email_domain, Profile, ProfileEmail};
pub use verifier::{CallbackParams, IdentityVerifier, StaticVerifier};
