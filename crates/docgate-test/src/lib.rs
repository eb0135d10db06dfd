//! # Docgate Test
//!
//! Test utilities for docgate, dispatching requests through middleware
//! chains in memory without binding a port.
//!
//! ## Key Features
//!
//! - **Request Builder**: fluent API for requests, including the Host,
//!   `X-Forwarded-Proto` and Cookie headers the gate reads
//! - **Cookie Jar**: a `cookie_store` jar keeps `Set-Cookie` values and
//!   replays them by path and scheme, so a sign-in followed by a page view
//!   behaves as in a browser
//! - **Response Assertions**: redirect, header and body helpers, plus the
//!   authorized flag the chain left behind
//!
//! ## Example
//!
//! ```ignore
//! use docgate_test::TestClient;
//!
//! #[tokio::test]
//! async fn signs_in() {
//!     let client = TestClient::new(docs.handler()).with_default_header("host", "localhost");
//!
//!     client
//!         .get("/api-docs/auth/callback?code=abc")
//!         .send()
//!         .await
//!         .assert_redirect("/api-docs");
//!
//!     assert!(client.get("/api-docs").send().await.is_authorized());
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/docgate-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
