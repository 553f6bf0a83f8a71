//! HTTP transport tests for CloudApiClient
//!
//! Each test starts a wiremock server, points a client at it and checks the
//! request that was sent and the result that came back.

use cloudapi_sdk::{
    ClientConfig, CloudApiClient, Envelope, FetchError, FetchResult, LogRecord, Method,
    RequestOptions,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::{
    matchers::{header, header_exists, header_regex, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const RSA_KEY: &str = include_str!("fixtures/test_rsa_key.pem");

type Records = Arc<Mutex<Vec<LogRecord>>>;

/// Build a client for `url`, capturing log records
fn client(url: &str, token: Option<&str>) -> (CloudApiClient, Records) {
    let records: Records = Arc::new(Mutex::new(Vec::new()));
    let sink = records.clone();

    let mut config = ClientConfig::new()
        .with_url(url)
        .with_key(RSA_KEY)
        .with_key_id("/demo/keys/1")
        .with_log(move |record: &LogRecord| sink.lock().unwrap().push(record.clone()));

    if let Some(token) = token {
        config = config.with_token(token);
    }

    (CloudApiClient::new(config).unwrap(), records)
}

// ============================================================================
// Successful requests
// ============================================================================

#[tokio::test]
async fn test_get_returns_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bacon"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"test": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, records) = client(&mock_server.uri(), None);

    let result = client.fetch("/bacon", RequestOptions::new()).await.unwrap();

    assert_eq!(result, FetchResult::Payload(json!({"test": 1})));
    assert!(records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_include_res_returns_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bacon"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req-42")
                .set_body_json(json!({"test": 1})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri(), None);

    let result = client
        .fetch("/bacon", RequestOptions::new().include_res(true))
        .await
        .unwrap();

    let envelope: &Envelope = result.envelope().expect("envelope requested");
    assert_eq!(envelope.payload, json!({"test": 1}));
    assert_eq!(envelope.res.status, 200);
    assert_eq!(envelope.res.header("X-Request-Id"), Some("req-42"));
}

#[tokio::test]
async fn test_query_is_appended_to_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bacon"))
        .and(query_param("strips", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri(), None);

    let result = client
        .fetch("/bacon", RequestOptions::new().query("strips", 2))
        .await
        .unwrap();

    assert_eq!(result.into_payload(), json!([]));
}

#[tokio::test]
async fn test_post_uses_post_verb() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/my/machines/abc"))
        .and(query_param("action", "stop"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri(), None);

    let result = client
        .fetch(
            "/my/machines/abc",
            RequestOptions::new()
                .method(Method::Post)
                .query("action", "stop"),
        )
        .await
        .unwrap();

    // Empty bodies decode to null
    assert_eq!(result.into_payload(), serde_json::Value::Null);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_requests_are_signed_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/my/keys"))
        .and(header_exists("Date"))
        .and(header_regex(
            "Authorization",
            r#"^Signature keyId="/demo/keys/1",algorithm="rsa-sha256",headers="date",signature="[A-Za-z0-9+/=]+"$"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri(), None);

    assert!(client.fetch("/my/keys", RequestOptions::new()).await.is_ok());
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/my/keys"))
        .and(header("Authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri(), Some("tok123"));

    assert!(client.fetch("/my/keys", RequestOptions::new()).await.is_ok());
}

#[tokio::test]
async fn test_invalid_key_fails_the_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let records: Records = Arc::new(Mutex::new(Vec::new()));
    let sink = records.clone();
    let client = CloudApiClient::new(
        ClientConfig::new()
            .with_url(mock_server.uri())
            .with_key(b"not a pem".to_vec())
            .with_log(move |record: &LogRecord| sink.lock().unwrap().push(record.clone())),
    )
    .unwrap();

    let err = client.fetch("/bacon", RequestOptions::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::Signing(_)));
    assert_eq!(records.lock().unwrap().len(), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_api_error_is_logged_and_reraised() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bacon"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "ResourceNotFound",
            "message": "bacon not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, records) = client(&mock_server.uri(), None);

    let err = client
        .fetch("/bacon", RequestOptions::new().query("strips", 2))
        .await
        .unwrap_err();

    assert!(err.is_structured());
    let payload = err.payload().unwrap();
    assert_eq!(payload.status_code, 404);
    assert_eq!(payload.error, "Not Found");
    assert_eq!(payload.message, "bacon not found");

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].parts, "/bacon?strips=2");
    assert_eq!(records[0].data.message, "bacon not found");
}

#[tokio::test]
async fn test_api_error_with_default_returns_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bacon"))
        .respond_with(ResponseTemplate::new(500).set_body_string("kitchen on fire"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, records) = client(&mock_server.uri(), None);

    let result = client
        .fetch(
            "/bacon",
            RequestOptions::new().method(Method::Post).default_value(0),
        )
        .await
        .unwrap();

    assert_eq!(result, FetchResult::Payload(json!(0)));

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data.message, "kitchen on fire");
    assert_eq!(records[0].data.status_code, Some(500));
}

#[tokio::test]
async fn test_malformed_response_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bacon"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, records) = client(&mock_server.uri(), None);

    let err = client.fetch("/bacon", RequestOptions::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
    assert!(!err.is_structured());
    assert_eq!(records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_network_error_with_empty_string_default() {
    // Nothing listens on the discard port
    let (client, records) = client("http://127.0.0.1:9", None);

    let result = client
        .fetch("/bacon", RequestOptions::new().default_value(""))
        .await
        .unwrap();

    assert_eq!(result, FetchResult::Payload(json!("")));

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].parts, "/bacon");
    assert!(records[0].data.status_code.is_none());
}

#[tokio::test]
async fn test_network_error_without_default_is_plain() {
    let (client, _) = client("http://127.0.0.1:9", None);

    let err = client.fetch("/bacon", RequestOptions::new()).await.unwrap_err();

    assert!(matches!(err, FetchError::Network(_)));
    assert!(err.payload().is_none());
}
