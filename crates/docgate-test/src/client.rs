//! Test client for in-memory dispatch.

use crate::error::TestError;
use crate::request::{TestRequest, TestRequestBuilder};
use crate::response::TestResponse;
use bytes::Bytes;
use cookie::Cookie;
use cookie_store::CookieStore;
use docgate_middleware::{Chain, Layer, Middleware, MiddlewareContext, Outcome};
use http::{header, HeaderValue, Method};
use parking_lot::Mutex;
use url::Url;

/// A test client that runs requests through a middleware chain.
///
/// The client behaves like a browser with a cookie jar. Every `Set-Cookie`
/// on a response is stored against the request URL (Host header and
/// `X-Forwarded-Proto` included), and later requests carry the cookies whose
/// `Path`, `Secure` and `Max-Age` attributes still match.
///
/// # Example
///
/// ```ignore
/// use docgate_test::TestClient;
///
/// let client = TestClient::new(docs.handler()).with_default_header("host", "localhost");
///
/// let response = client.get("/api-docs").send().await;
/// response.assert_body_contains("You need to authenticate yourself");
/// ```
#[must_use]
pub struct TestClient {
    chain: Chain,
    /// Default headers to add to all requests.
    default_headers: Vec<(String, String)>,
    jar: Mutex<CookieJar>,
}

impl TestClient {
    /// Creates a client dispatching to `middleware`.
    pub fn new<M: Middleware>(middleware: M) -> Self {
        Self::from_layer(Layer::handler(middleware))
    }

    /// Creates a client dispatching to an existing layer.
    pub fn from_layer(layer: Layer) -> Self {
        Self {
            chain: Chain::new([layer]),
            default_headers: Vec::new(),
            jar: Mutex::new(CookieJar::default()),
        }
    }

    /// Adds a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Returns the stored value of an unexpired cookie, whatever its path.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.jar.lock().get(name)
    }

    /// Stores a cookie for every path of the default host, as if a response
    /// had set it with `Path=/`.
    ///
    /// # Panics
    ///
    /// Panics if the default headers do not form a valid URL or the cookie
    /// is rejected.
    pub fn set_cookie(&self, name: impl Into<String>, value: impl Into<String>) {
        let request = self
            .get("/")
            .builder
            .build()
            .expect("default headers should form a request");
        let url = request_url(&request).expect("default headers should form a URL");
        let cookie = Cookie::build((name.into(), value.into())).path("/").build();
        self.jar
            .lock()
            .insert(&cookie, &url)
            .expect("cookie should be accepted");
    }

    /// Forgets every stored cookie.
    pub fn clear_cookies(&self) {
        self.jar.lock().clear();
    }

    /// Creates a GET request builder.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::get(uri))
    }

    /// Creates a POST request builder.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::post(uri))
    }

    /// Creates a request builder with a custom method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequestBuilder::new(method, uri))
    }

    async fn send_internal(
        &self,
        request: TestRequest,
        url: &Url,
    ) -> Result<TestResponse, TestError> {
        let request = request.into_http_request()?;
        let mut ctx = MiddlewareContext::for_request(&request);

        let response = match self.chain.run(&mut ctx, &request).await? {
            Outcome::Respond(response) => TestResponse::from_http(response).await?,
            Outcome::Continue => TestResponse::unhandled(),
        }
        .with_authorized(ctx.is_authorized());

        self.jar.lock().store_response(&response, url);

        Ok(response)
    }
}

/// A request builder bound to a test client.
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
    use_jar: bool,
}

impl<'a> TestClientRequest<'a> {
    fn new(client: &'a TestClient, builder: TestRequestBuilder) -> Self {
        let mut builder = builder;
        for (name, value) in &client.default_headers {
            builder = builder.header(name, value);
        }
        Self {
            client,
            builder,
            use_jar: true,
        }
    }

    /// Sets a header on the request.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Adds a cookie to this request only.
    pub fn cookie(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.cookie(name, value);
        self
    }

    /// Sends this request without the stored cookies.
    pub fn without_cookies(mut self) -> Self {
        self.use_jar = false;
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sends the request and returns the response.
    ///
    /// # Panics
    ///
    /// Panics if the request is invalid or the chain fails.
    pub async fn send(self) -> TestResponse {
        self.try_send().await.expect("request should succeed")
    }

    /// Sends the request and returns a Result.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let mut request = self.builder.build()?;
        let url = request_url(&request)?;
        if self.use_jar {
            self.client.jar.lock().attach(&url, &mut request)?;
        }
        self.client.send_internal(request, &url).await
    }
}

/// The URL a browser would have requested: scheme from the URI or
/// `X-Forwarded-Proto`, authority from the URI or the Host header.
fn request_url(request: &TestRequest) -> Result<Url, TestError> {
    let header_str = |name: &str| {
        request
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    };
    let scheme = request
        .uri
        .scheme_str()
        .or_else(|| header_str("x-forwarded-proto"))
        .unwrap_or("http");
    let host = request
        .uri
        .authority()
        .map(http::uri::Authority::as_str)
        .or_else(|| header_str(header::HOST.as_str()))
        .unwrap_or("localhost");
    let path = request
        .uri
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);

    Url::parse(&format!("{scheme}://{host}{path}"))
        .map_err(|e| TestError::RequestBuild(format!("Invalid request URL: {e}")))
}

/// Browser-style cookie storage.
#[derive(Debug, Default)]
struct CookieJar {
    store: CookieStore,
}

impl CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.store
            .iter_unexpired()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string())
    }

    fn insert(&mut self, cookie: &Cookie<'_>, url: &Url) -> Result<(), TestError> {
        self.store
            .insert_raw(cookie, url)
            .map(|_| ())
            .map_err(|e| TestError::InvalidHeader(e.to_string()))
    }

    /// Stores every acceptable `Set-Cookie`; rejected ones are dropped.
    fn store_response(&mut self, response: &TestResponse, url: &Url) {
        for line in response.set_cookies() {
            let _ = self.store.parse(line, url);
        }
    }

    /// Adds the cookies matching `url` to the request's Cookie header.
    fn attach(&self, url: &Url, request: &mut TestRequest) -> Result<(), TestError> {
        let stored: Vec<String> = self
            .store
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        if stored.is_empty() {
            return Ok(());
        }

        let explicit = request
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let line = explicit.into_iter().chain(stored).collect::<Vec<_>>().join("; ");
        let value =
            HeaderValue::try_from(line).map_err(|e| TestError::InvalidHeader(e.to_string()))?;
        request.headers.insert(header::COOKIE, value);
        Ok(())
    }

    fn clear(&mut self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgate_middleware::{FnMiddleware, MiddlewareError, RequestExt, Response, ResponseExt};
    use http::{header, HeaderValue, StatusCode};

    /// Echoes the Cookie header and sets `visited=yes`.
    fn echo_cookies() -> Layer {
        Layer::handler(FnMiddleware::new("echo_cookies", |ctx, req| {
            let cookies = req
                .headers()
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            Box::pin(async move {
                ctx.queue_set_cookie(HeaderValue::from_static("visited=yes; Path=/"));
                Ok(Outcome::Respond(Response::html(cookies)))
            })
        }))
    }

    #[tokio::test]
    async fn test_cookie_jar_round_trip() {
        let client = TestClient::from_layer(echo_cookies());

        let first = client.get("/").send().await;
        assert_eq!(first.text().unwrap(), "none");
        assert_eq!(client.cookie("visited").as_deref(), Some("yes"));

        let second = client.get("/").send().await;
        assert_eq!(second.text().unwrap(), "visited=yes");

        let bare = client.get("/").without_cookies().send().await;
        assert_eq!(bare.text().unwrap(), "none");

        client.clear_cookies();
        assert!(client.cookie("visited").is_none());
    }

    /// Echoes the Cookie header and sets `session=1` with the given attributes.
    fn scoped_cookie(attributes: &'static str) -> Layer {
        Layer::handler(FnMiddleware::new("scoped_cookie", move |ctx, req| {
            let cookies = req
                .headers()
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            Box::pin(async move {
                if cookies == "none" {
                    let line = format!("session=1; {attributes}");
                    ctx.queue_set_cookie(HeaderValue::try_from(line).unwrap());
                }
                Ok(Outcome::Respond(Response::html(cookies)))
            })
        }))
    }

    #[tokio::test]
    async fn test_cookie_path_scoping() {
        let client = TestClient::from_layer(scoped_cookie("Path=/api-docs"))
            .with_default_header("host", "docs.example.com");

        client.get("/api-docs/auth/callback").send().await;
        assert_eq!(client.cookie("session").as_deref(), Some("1"));

        let inside = client.get("/api-docs").send().await;
        assert_eq!(inside.text().unwrap(), "session=1");

        let nested = client.get("/api-docs/swagger.json").send().await;
        assert_eq!(nested.text().unwrap(), "session=1");

        let outside = client.get("/pets").send().await;
        assert_eq!(outside.text().unwrap(), "none");
    }

    #[tokio::test]
    async fn test_secure_cookie_needs_https() {
        let client = TestClient::from_layer(scoped_cookie("Path=/; Secure"))
            .with_default_header("host", "docs.example.com");

        client.get("/").header("x-forwarded-proto", "https").send().await;
        assert_eq!(client.cookie("session").as_deref(), Some("1"));

        let secure = client.get("/").header("x-forwarded-proto", "https").send().await;
        assert_eq!(secure.text().unwrap(), "session=1");

        let plain = client.get("/").send().await;
        assert_eq!(plain.text().unwrap(), "none");
    }

    #[tokio::test]
    async fn test_zero_max_age_removes_cookie() {
        let expire = TestClient::from_layer(Layer::handler(FnMiddleware::new(
            "expire",
            |ctx, _req| {
                Box::pin(async move {
                    ctx.queue_set_cookie(HeaderValue::from_static("visited=; Path=/; Max-Age=0"));
                    Ok(Outcome::Respond(Response::html("bye")))
                })
            },
        )));
        expire.set_cookie("visited", "yes");
        assert!(expire.cookie("visited").is_some());
        expire.get("/").send().await;
        assert!(expire.cookie("visited").is_none());
    }

    #[tokio::test]
    async fn test_default_headers() {
        let client = TestClient::new(FnMiddleware::new("host", |_ctx, req| {
            let host = req.host().unwrap_or("none").to_string();
            Box::pin(async move { Ok(Outcome::Respond(Response::html(host))) })
        }))
        .with_default_header("Host", "localhost:3000");

        let response = client.get("/").send().await;
        assert_eq!(response.text().unwrap(), "localhost:3000");
    }

    #[tokio::test]
    async fn test_unhandled_request() {
        let client = TestClient::new(FnMiddleware::new("flag", |ctx, _req| {
            Box::pin(async move {
                ctx.set_authorized(true);
                Ok(Outcome::Continue)
            })
        }));

        let response = client.get("/").send().await;
        assert!(!response.is_handled());
        assert!(response.is_authorized());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chain_error_surfaces() {
        let client = TestClient::new(FnMiddleware::new("boom", |_ctx, _req| {
            Box::pin(async { Err(MiddlewareError::failed("boom", "no")) })
        }));

        let err = client.post("/").try_send().await.unwrap_err();
        assert!(matches!(err, TestError::Dispatch(ref e) if e.middleware() == "boom"));
    }
}
