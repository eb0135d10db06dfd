//! Test request building.

use crate::error::TestError;
use bytes::Bytes;
use docgate_middleware::Request;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use http_body_util::Full;
use serde::Serialize;

/// A test request that can be sent to a [`TestClient`](crate::TestClient).
#[derive(Debug)]
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Bytes,
}

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new PATCH request.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Creates a new DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Converts this request to the request type middleware receives.
    pub fn into_http_request(self) -> Result<Request, TestError> {
        let mut request = http::Request::builder()
            .method(self.method)
            .uri(self.uri)
            .body(Full::new(self.body))
            .map_err(|e| TestError::RequestBuild(e.to_string()))?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }
}

/// Builder for constructing test requests.
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    cookies: Vec<String>,
    body: Option<Bytes>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            body: None,
        }
    }

    /// Sets a header on the request.
    ///
    /// # Panics
    ///
    /// Panics if the name or value is not a valid header.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let request = TestRequest::get("/api-docs")
    ///     .header("X-Forwarded-Proto", "https")
    ///     .build();
    /// ```
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref()).expect("valid header name");
        let value = HeaderValue::try_from(value.as_ref()).expect("valid header value");
        self.headers.insert(name, value);
        self
    }

    /// Sets the Host header.
    pub fn host(self, host: impl AsRef<str>) -> Self {
        self.header(header::HOST.as_str(), host)
    }

    /// Declares the client-facing protocol the way a reverse proxy would.
    pub fn forwarded_proto(self, proto: impl AsRef<str>) -> Self {
        self.header("x-forwarded-proto", proto)
    }

    /// Adds a cookie; every added cookie is sent in one Cookie header.
    pub fn cookie(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.cookies
            .push(format!("{}={}", name.as_ref(), value.as_ref()));
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the request body as JSON.
    ///
    /// This also sets the `Content-Type` header to `application/json`.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be serialized.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        let bytes = serde_json::to_vec(value).expect("JSON serialization should succeed");
        self.body = Some(Bytes::from(bytes));
        self.content_type("application/json")
    }

    /// Sets the request body as form-urlencoded.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be encoded.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        let encoded = serde_urlencoded::to_string(value).expect("form encoding should succeed");
        self.body = Some(Bytes::from(encoded));
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Builds the test request.
    pub fn build(mut self) -> Result<TestRequest, TestError> {
        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URI: {e}")))?;

        if !self.cookies.is_empty() {
            let value = HeaderValue::try_from(self.cookies.join("; "))
                .map_err(|e| TestError::InvalidHeader(e.to_string()))?;
            self.headers.append(header::COOKIE, value);
        }

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_request() {
        let request = TestRequest::get("/api-docs").build().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri.path(), "/api-docs");
    }

    #[test]
    fn test_delete_request() {
        let request = TestRequest::delete("/pets/1").build().unwrap();
        assert_eq!(request.method, Method::DELETE);
    }

    #[test]
    fn test_host_and_proto() {
        let request = TestRequest::get("/")
            .host("localhost:3000")
            .forwarded_proto("https")
            .build()
            .unwrap();

        assert_eq!(request.headers.get("host").unwrap(), "localhost:3000");
        assert_eq!(request.headers.get("x-forwarded-proto").unwrap(), "https");
    }

    #[test]
    fn test_cookies_share_one_header() {
        let request = TestRequest::get("/")
            .cookie("a", "1")
            .cookie("b", "2")
            .build()
            .unwrap();

        assert_eq!(request.headers.get_all(header::COOKIE).iter().count(), 1);
        assert_eq!(request.headers.get(header::COOKIE).unwrap(), "a=1; b=2");
    }

    #[test]
    fn test_json_body() {
        let request = TestRequest::post("/pets")
            .json(&json!({"name": "Rex"}))
            .build()
            .unwrap();

        assert_eq!(
            request.headers.get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(request.body.as_ref(), b"{\"name\":\"Rex\"}");
    }

    #[test]
    fn test_form_body() {
        let request = TestRequest::post("/token")
            .form(&[("code", "a b"), ("grant_type", "authorization_code")])
            .build()
            .unwrap();

        assert_eq!(
            request.body.as_ref(),
            b"code=a+b&grant_type=authorization_code"
        );
    }

    #[test]
    fn test_invalid_uri() {
        let result = TestRequest::get("not a uri").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_into_http_request() {
        let request = TestRequest::get("/api-docs?failed=true")
            .header("X-Test", "value")
            .build()
            .unwrap();

        let http_request = request.into_http_request().unwrap();
        assert_eq!(http_request.method(), Method::GET);
        assert_eq!(http_request.uri().query(), Some("failed=true"));
        assert_eq!(http_request.headers().get("X-Test").unwrap(), "value");
    }
}
