//! Serving registered docs through the facade, open and gated.

use chrono::{DateTime, Utc};
use docgate::middleware::{Layer, Mount};
use docgate::oauth::{Profile, StaticVerifier};
use docgate::session::{ManualClock, COOKIE_NAME};
use docgate::{ApiDocs, GoogleOAuthConfig, Info};
use docgate_test::TestClient;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(3600);

fn info() -> Info {
    Info::new("Pet Store", "1.0.0").description("API for my Pet Store")
}

fn oauth() -> GoogleOAuthConfig {
    GoogleOAuthConfig::new("client-id", "client-secret", "cookie-secret")
        .allowed_domains(["example.com", "example.org"])
        .with_session_duration(HOUR)
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap(),
    ))
}

fn gated_docs(email: &str, verified: bool, clock: &Arc<ManualClock>) -> ApiDocs {
    ApiDocs::new(info(), Some(oauth()))
        .with_verifier(Arc::new(StaticVerifier::returning(Profile::with_email(
            email, verified,
        ))))
        .with_clock(clock.clone())
}

fn client(layer: Layer) -> TestClient {
    TestClient::new(Mount::new("/api-docs", layer))
        .with_default_header("host", "docs.example.com")
        .with_default_header("x-forwarded-proto", "https")
}

fn docs_client(docs: &ApiDocs) -> TestClient {
    client(Layer::handler(docs.handler().unwrap()))
}

#[tokio::test]
async fn open_docs_serve_ui_and_document() {
    let docs = ApiDocs::new(info(), None);
    let pet = docs
        .definition(
            "Pet",
            json!({ "type": "object", "properties": { "name": { "type": "string" } } }),
        )
        .unwrap();
    docs.get(
        "/pet",
        json!({ "responses": { "200": { "schema": { "type": "array", "items": { "$ref": pet } } } } }),
    )
    .unwrap();

    let client = docs_client(&docs);

    client
        .get("/api-docs")
        .send()
        .await
        .assert_status(http::StatusCode::OK)
        .assert_content_type("text/html")
        .assert_body_contains("swagger-ui")
        .assert_body_contains("Pet Store");

    let document: Value = client.get("/api-docs/swagger.json").send().await.json().unwrap();
    assert_eq!(document["swagger"], "2.0");
    assert_eq!(document["info"]["description"], "API for my Pet Store");
    assert_eq!(
        document["paths"]["/pet"]["get"]["responses"]["200"]["schema"]["items"]["$ref"],
        "#/definitions/Pet"
    );
    assert!(document["definitions"]["Pet"].is_object());
}

#[tokio::test]
async fn document_is_captured_on_first_request() {
    let docs = ApiDocs::new(info(), None);
    let client = docs_client(&docs);

    docs.post("/pet", json!({ "description": "Add a pet to the store" }))
        .unwrap();

    let document: Value = client.get("/api-docs/swagger.json").send().await.json().unwrap();
    assert!(document["paths"]["/pet"]["post"].is_object());

    docs.delete("/pet/{id}", json!({})).unwrap();

    let document: Value = client.get("/api-docs/swagger.json").send().await.json().unwrap();
    assert!(document["paths"].get("/pet/{id}").is_none());

    let fresh = docs_client(&docs);
    let document: Value = fresh.get("/api-docs/swagger.json").send().await.json().unwrap();
    assert!(document["paths"]["/pet/{id}"]["delete"].is_object());
}

#[tokio::test]
async fn requests_outside_the_docs_fall_through() {
    let docs = ApiDocs::new(info(), None);
    let client = docs_client(&docs);

    assert!(!client.get("/pets").send().await.is_handled());
    assert!(!client.post("/api-docs").send().await.is_handled());
    assert!(!client.get("/api-docs/unknown").send().await.is_handled());
}

#[tokio::test]
async fn gated_docs_sign_in_and_expire() {
    let clock = clock();
    let docs = gated_docs("alice@example.org", true, &clock);
    docs.get("/pet", json!({})).unwrap();
    let client = docs_client(&docs);

    client
        .get("/api-docs")
        .send()
        .await
        .assert_status(http::StatusCode::OK)
        .assert_body_contains("You need to authenticate yourself")
        .assert_body_contains(r#"<a href="/api-docs/auth">"#)
        .assert_body_lacks("Authentication failed")
        .assert_body_lacks("swagger-ui");

    let start = client.get("/api-docs/auth").send().await;
    let location = start.location().unwrap();
    assert!(location.starts_with("https://provider.invalid/authorize?"));
    assert!(location.contains("docs.example.com%2Fapi-docs%2Fauth%2Fcallback"));

    client
        .get("/api-docs/auth/callback?code=4%2F0Ab")
        .send()
        .await
        .assert_redirect("/api-docs");
    assert!(client.cookie(COOKIE_NAME).is_some());

    let page = client.get("/api-docs").send().await;
    assert!(page.is_authorized());
    page.assert_body_contains("swagger-ui");

    clock.advance(HOUR + Duration::from_millis(1));

    let expired = client.get("/api-docs").send().await;
    assert!(!expired.is_authorized());
    expired.assert_body_contains("You need to authenticate yourself");
}

#[tokio::test]
async fn gated_docs_reject_other_domains() {
    let clock = clock();
    let docs = gated_docs("mallory@example.net", true, &clock);
    let client = docs_client(&docs);

    client
        .get("/api-docs/auth/callback?code=abc")
        .send()
        .await
        .assert_redirect("/api-docs?failed=true");
    assert!(client.cookie(COOKIE_NAME).is_none());

    client
        .get("/api-docs?failed=true")
        .send()
        .await
        .assert_body_contains("Authentication failed")
        .assert_body_contains("You need to authenticate yourself");
}

#[tokio::test]
async fn authorization_middleware_only_sets_the_flag() {
    let clock = clock();
    let docs = gated_docs("alice@example.com", true, &clock);
    let signed_in = docs_client(&docs);
    signed_in
        .get("/api-docs/auth/callback?code=abc")
        .send()
        .await
        .assert_redirect("/api-docs");
    let cookie = signed_in.cookie(COOKIE_NAME).unwrap();

    let api = client(docs.authorization_middleware().unwrap());

    let anonymous = api.get("/api-docs/pets").send().await;
    assert!(!anonymous.is_handled());
    assert!(!anonymous.is_authorized());

    api.set_cookie(COOKIE_NAME, cookie);
    let authorized = api.get("/api-docs/pets").send().await;
    assert!(!authorized.is_handled());
    assert!(authorized.is_authorized());
}

#[tokio::test]
async fn authorization_middleware_without_oauth_passes_through() {
    let docs = ApiDocs::new(info(), None);
    let api = client(docs.authorization_middleware().unwrap());

    let response = api.get("/api-docs/pets").send().await;
    assert!(!response.is_handled());
    assert!(!response.is_authorized());
}
