//! Common types used throughout the middleware chain.
//!
//! This module defines the HTTP request and response types handled by
//! middleware, together with small extension traits for the parts of a
//! request the gate needs (query pairs, declared protocol, raw host).

use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use http_body_util::Full;

/// The HTTP request type used in the middleware chain.
///
/// This is a standard `http::Request` with a `Full<Bytes>` body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the middleware chain.
///
/// This is a standard `http::Response` with a `Full<Bytes>` body.
pub type Response = http::Response<Full<Bytes>>;

/// Header set by reverse proxies to declare the client-facing protocol.
pub const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// Read-only helpers over an incoming [`Request`].
pub trait RequestExt {
    /// Returns the decoded query string pairs, in order.
    ///
    /// A malformed query string yields no pairs.
    fn query_pairs(&self) -> Vec<(String, String)>;

    /// Returns the first value of the given query parameter.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Returns the protocol the client used (`http` or `https`).
    ///
    /// The scheme of an absolute request URI wins, then the
    /// `X-Forwarded-Proto` header, then `http`.
    fn protocol(&self) -> String;

    /// Returns the raw `Host` header, including any non-default port.
    fn host(&self) -> Option<&str>;
}

impl RequestExt for Request {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.uri()
            .query()
            .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
            .unwrap_or_default()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    fn protocol(&self) -> String {
        if let Some(scheme) = self.uri().scheme_str() {
            return scheme.to_ascii_lowercase();
        }

        self.headers()
            .get(FORWARDED_PROTO_HEADER)
            .and_then(|v| v.to_str().ok())
            // Proxies may append their own hop: "https, http"
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "http".to_string())
    }

    fn host(&self) -> Option<&str> {
        self.headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| self.uri().authority().map(http::uri::Authority::as_str))
    }
}

/// Extension trait for building the responses the gate emits.
pub trait ResponseExt {
    /// Creates a `200 OK` HTML response.
    fn html(body: impl Into<String>) -> Response;

    /// Creates a `200 OK` JSON response from an already serialized body.
    fn json(body: impl Into<String>) -> Response;

    /// Creates a `302 Found` redirect to `location`.
    ///
    /// Falls back to `/` if `location` is not a valid header value.
    fn redirect(location: &str) -> Response;

    /// Creates a plain text response with the given status code.
    fn text(status: StatusCode, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn html(body: impl Into<String>) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::from(body.into())));
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        response
    }

    fn json(body: impl Into<String>) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::from(body.into())));
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }

    fn redirect(location: &str) -> Response {
        let location =
            HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.status_mut() = StatusCode::FOUND;
        response.headers_mut().insert(header::LOCATION, location);
        response
    }

    fn text(status: StatusCode, message: &str) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::from(message.to_string())));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}

/// Escapes text for use in HTML content or a double-quoted attribute.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
