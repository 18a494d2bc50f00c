#![allow(clippy::unwrap_used)]
// Integration tests for `HttpTransport` and `Retrying` using wiremock.

use bytes::Bytes;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use refuapp_api::{
    Body, Endpoints, FormPart, HttpTransport, Reply, Request, RetryPolicy, Retrying, Transport,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HttpTransport, Endpoints) {
    let server = MockServer::start().await;
    let endpoints = Endpoints::new(&Url::parse(&server.uri()).unwrap()).unwrap();
    (server, HttpTransport::with_client(reqwest::Client::new()), endpoints)
}

// ── Success replies ─────────────────────────────────────────────────

#[tokio::test]
async fn test_get_returns_json_body() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("GET"))
        .and(path("/refuges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "Refugi"}])))
        .mount(&server)
        .await;

    let reply = transport
        .send(Request::get(endpoints.refuges()))
        .await
        .unwrap();

    assert_eq!(reply, Reply::Success(json!([{"name": "Refugi"}])));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/refuges/507f191e810c19729de860ea"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::delete(endpoints.refuge("507f191e810c19729de860ea"))
        .with_bearer(Some(SecretString::from("s3cret".to_owned())));
    let reply = transport.send(request).await.unwrap();

    assert!(reply.is_success());
}

#[tokio::test]
async fn test_multipart_form_fields_are_sent() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login/"))
        .and(body_string_contains("name=\"username\""))
        .and(body_string_contains("name=\"scope\""))
        .and(body_string_contains("admin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "t", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let body = Body::Multipart(vec![
        FormPart::text("username", "warden"),
        FormPart::secret("password", SecretString::from("pw".to_owned())),
        FormPart::text("scope", "admin"),
    ]);
    let reply = transport
        .send(Request::post(endpoints.login(), body))
        .await
        .unwrap();

    assert!(reply.is_success());
}

#[tokio::test]
async fn test_file_part_is_uploaded() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("POST"))
        .and(path("/images/"))
        .and(body_string_contains("name=\"image\""))
        .and(body_string_contains("image/png"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!("a1b2.png")))
        .mount(&server)
        .await;

    let body = Body::Multipart(vec![FormPart::File {
        name: "image".into(),
        file_name: "photo.png".into(),
        content_type: "image/png".into(),
        bytes: Bytes::from_static(b"PNGDATA"),
    }]);
    let reply = transport
        .send(Request::post(endpoints.images(), body))
        .await
        .unwrap();

    assert_eq!(reply, Reply::Success(json!("a1b2.png")));
}

// ── Failure replies ─────────────────────────────────────────────────

#[tokio::test]
async fn test_failure_keeps_status_and_body() {
    let (server, transport, endpoints) = setup().await;

    let detail = json!({"detail": [{"loc": ["body", 1], "msg": "X", "type": "Y"}]});
    Mock::given(method("POST"))
        .and(path("/refuges/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(&detail))
        .mount(&server)
        .await;

    let reply = transport
        .send(Request::post(
            endpoints.refuges(),
            Body::Json(json!({"name": ""})),
        ))
        .await
        .unwrap();

    assert_eq!(
        reply,
        Reply::Failure {
            status: 422,
            body: detail
        }
    );
}

#[tokio::test]
async fn test_empty_failure_body_is_null() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let reply = transport
        .send(Request::get(endpoints.refuge("missing")))
        .await
        .unwrap();

    assert_eq!(
        reply,
        Reply::Failure {
            status: 404,
            body: Value::Null
        }
    );
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    let transport = HttpTransport::with_client(reqwest::Client::new());
    let endpoints = Endpoints::new(&Url::parse("http://127.0.0.1:1").unwrap()).unwrap();

    let result = transport
        .send(Request::get(endpoints.refuges()))
        .await;

    assert!(result.is_err(), "expected Unreachable, got: {result:?}");
}

// ── Retry decorator ─────────────────────────────────────────────────

#[tokio::test]
async fn test_retrying_resends_failed_requests() {
    let (server, transport, endpoints) = setup().await;

    Mock::given(method("GET"))
        .and(path("/refuges/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let transport = Retrying::new(transport, RetryPolicy::default());
    let reply = transport
        .send(Request::get(endpoints.refuges()))
        .await
        .unwrap();

    assert!(matches!(reply, Reply::Failure { status: 500, .. }));
}
