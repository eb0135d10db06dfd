//! Test response wrapper.

use crate::error::TestError;
use bytes::Bytes;
use cookie::Cookie;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;

/// A test response with helper methods for assertions.
///
/// Besides the HTTP response it records what the chain left behind: whether
/// a layer answered at all, and the authorized flag at the end of dispatch.
pub struct TestResponse {
    /// HTTP status code
    status: StatusCode,
    /// Response headers
    headers: HeaderMap,
    /// Response body bytes
    body: Bytes,
    /// False if every layer continued
    handled: bool,
    /// Authorized flag after dispatch
    authorized: bool,
}

impl TestResponse {
    /// Creates a new test response from an HTTP response.
    pub async fn from_http<B>(response: http::Response<B>) -> Result<Self, TestError>
    where
        B: http_body_util::BodyExt,
        B::Error: fmt::Display,
    {
        let (parts, body) = response.into_parts();
        let body_bytes = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body: body_bytes,
            handled: true,
            authorized: false,
        })
    }

    /// Creates the response recorded when no layer answered.
    #[must_use]
    pub fn unhandled() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            handled: false,
            authorized: false,
        }
    }

    /// Creates a test response from raw parts (for testing).
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            handled: true,
            authorized: false,
        }
    }

    pub(crate) fn with_authorized(mut self, authorized: bool) -> Self {
        self.authorized = authorized;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns true if some layer answered the request.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Returns the authorized flag as the chain left it.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Returns a reference to the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Returns the Location header value.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header_str(header::LOCATION.as_str())
    }

    /// Returns every Set-Cookie header value.
    #[must_use]
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Returns the full Set-Cookie line for the named cookie.
    #[must_use]
    pub fn set_cookie(&self, name: &str) -> Option<&str> {
        self.set_cookies()
            .into_iter()
            .find(|line| Cookie::parse(*line).is_ok_and(|cookie| cookie.name() == name))
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_slice(&self.body).map_err(TestError::Json)
    }

    // Assertion methods

    /// Asserts that the status code equals the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}",
            expected, self.status
        );
        self
    }

    /// Asserts a `302 Found` to `location`.
    ///
    /// # Panics
    ///
    /// Panics if the response is not that redirect.
    pub fn assert_redirect(&self, location: &str) -> &Self {
        self.assert_status(StatusCode::FOUND);
        assert_eq!(self.location(), Some(location), "redirect target mismatch");
        self
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header doesn't exist or doesn't match.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(
            actual, expected,
            "Header '{}': expected '{}', got '{}'",
            name, expected, actual
        );
        self
    }

    /// Asserts that the Content-Type header starts with `expected`.
    ///
    /// # Panics
    ///
    /// Panics if Content-Type doesn't match.
    pub fn assert_content_type(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let actual = self
            .content_type()
            .expect("Content-Type header not found");
        assert!(
            actual.starts_with(expected),
            "Content-Type: expected '{}', got '{}'",
            expected,
            actual
        );
        self
    }

    /// Asserts that the body contains the expected substring.
    ///
    /// # Panics
    ///
    /// Panics if the body doesn't contain the substring.
    pub fn assert_body_contains(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let body = self.text().expect("Body should be valid UTF-8");
        assert!(
            body.contains(expected),
            "Body should contain '{}', got: {}",
            expected,
            body
        );
        self
    }

    /// Asserts that the body does not contain the substring.
    ///
    /// # Panics
    ///
    /// Panics if the body contains the substring.
    pub fn assert_body_lacks(&self, unexpected: impl AsRef<str>) -> &Self {
        let unexpected = unexpected.as_ref();
        let body = self.text().expect("Body should be valid UTF-8");
        assert!(
            !body.contains(unexpected),
            "Body should not contain '{}', got: {}",
            unexpected,
            body
        );
        self
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .field("handled", &self.handled)
            .field("authorized", &self.authorized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_cookies() -> TestResponse {
        let mut headers = HeaderMap::new();
        headers.insert(header::LOCATION, HeaderValue::from_static("/api-docs"));
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("theme=dark; Path=/"),
        );
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("api-docs-authorized=s%3Aj%3A...; Path=/api-docs; HttpOnly"),
        );
        TestResponse::new(StatusCode::FOUND, headers, Bytes::new())
    }

    #[test]
    fn test_set_cookie_lookup() {
        let response = response_with_cookies();
        assert_eq!(response.set_cookies().len(), 2);
        assert!(response
            .set_cookie("api-docs-authorized")
            .unwrap()
            .contains("Path=/api-docs"));
        assert!(response.set_cookie("missing").is_none());
    }

    #[test]
    fn test_assert_redirect() {
        response_with_cookies().assert_redirect("/api-docs");
    }

    #[test]
    #[should_panic(expected = "redirect target mismatch")]
    fn test_assert_redirect_wrong_target() {
        response_with_cookies().assert_redirect("/elsewhere");
    }

    #[test]
    fn test_unhandled() {
        let response = TestResponse::unhandled();
        assert!(!response.is_handled());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_text_and_json() {
        let response = TestResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from_static(br#"{"swagger":"2.0"}"#),
        );
        assert_eq!(response.text().unwrap(), r#"{"swagger":"2.0"}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["swagger"], "2.0");
        response.assert_body_contains("swagger").assert_body_lacks("openapi");
    }
}
