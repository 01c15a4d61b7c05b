//! Integration tests for publishing to the ingestion endpoint.
//!
//! Tests cover:
//! - Accepted and rejected outcomes
//! - Single request per publish (no retry)
//! - Wire format: URL, headers, body
//! - Signature verification on the receiving side
//! - Transport failures

use chrono::{TimeZone, Utc};
use shared::input::Payload;
use shared::publisher::{PublishError, PublishOutcome};
use shared::signature::build_signature;

use super::common::{publisher_for, spawn_mock, test_credentials, TEST_KEY};

#[tokio::test]
async fn test_202_is_accepted() {
    let server = spawn_mock(202).await;
    let publisher = publisher_for(&server);
    let payload: Payload = r#"[{"Computer": "host-1", "Value": 1}]"#.parse().unwrap();

    let outcome = publisher
        .publish(&test_credentials(), &payload)
        .await
        .unwrap();

    assert_eq!(outcome, PublishOutcome::Accepted { status: 202 });
    assert_eq!(outcome.to_string(), "Accepted");
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_200_is_accepted() {
    let server = spawn_mock(200).await;
    let publisher = publisher_for(&server);
    let payload: Payload = "{}".parse().unwrap();

    let outcome = publisher
        .publish(&test_credentials(), &payload)
        .await
        .unwrap();

    assert!(outcome.is_accepted());
}

#[tokio::test]
async fn test_401_is_reported_without_retry() {
    let server = spawn_mock(401).await;
    let publisher = publisher_for(&server);
    let payload: Payload = r#"{"a":1}"#.parse().unwrap();

    let outcome = publisher
        .publish(&test_credentials(), &payload)
        .await
        .unwrap();

    assert_eq!(outcome, PublishOutcome::Rejected { status: 401 });
    assert_eq!(outcome.to_string(), "Response code: 401");
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_reported_without_retry() {
    let server = spawn_mock(503).await;
    let publisher = publisher_for(&server);
    let payload: Payload = r#"{"a":1}"#.parse().unwrap();

    let outcome = publisher
        .publish(&test_credentials(), &payload)
        .await
        .unwrap();

    assert_eq!(outcome.status(), 503);
    assert!(!outcome.is_accepted());
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_request_wire_format() {
    let server = spawn_mock(202).await;
    let publisher = publisher_for(&server);
    let payload: Payload = r#"{"a": 1}"#.parse().unwrap();
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    publisher
        .publish_at(&test_credentials(), &payload, timestamp)
        .await
        .unwrap();

    let requests = server.requests();
    let request = &requests[0];
    assert_eq!(request.uri, "/api/logs?api-version=2016-04-01");
    assert_eq!(request.body, r#"{"a":1}"#);
    assert_eq!(request.header("content-type"), "application/json");
    assert_eq!(request.header("content-length"), "7");
    assert_eq!(request.header("log-type"), "IntegrationTest");
    assert_eq!(request.header("x-ms-date"), "Mon, 01 Jan 2024 00:00:00 GMT");
    assert_eq!(
        request.header("authorization"),
        "SharedKey test-workspace:81SeRLCEpXIIqaXmsjH/9W4GYprKCTQHbl0fGTIJqi0="
    );
}

#[tokio::test]
async fn test_signature_verifies_on_receiver() {
    let server = spawn_mock(202).await;
    let publisher = publisher_for(&server);
    let payload: Payload = r#"[{"event": "login", "user": "alice", "ok": true}]"#
        .parse()
        .unwrap();

    publisher
        .publish(&test_credentials(), &payload)
        .await
        .unwrap();

    let requests = server.requests();
    let request = &requests[0];
    let expected = build_signature(
        "test-workspace",
        TEST_KEY,
        request.header("x-ms-date"),
        request.body.len(),
        "POST",
        request.header("content-type"),
        "/api/logs",
    )
    .unwrap();

    assert_eq!(request.header("authorization"), expected);
}

#[tokio::test]
async fn test_invalid_key_never_reaches_server() {
    let server = spawn_mock(202).await;
    let publisher = publisher_for(&server);
    let payload: Payload = "{}".parse().unwrap();
    let mut creds = test_credentials();
    creds.shared_key = "not*base64".to_string();

    let result = publisher.publish(&creds, &payload).await;

    assert!(matches!(result, Err(PublishError::Signature(_))));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = shared::publisher::PublisherConfig::default().with_endpoint(
        shared::config::IngestionEndpoint::default().with_base_url(format!("http://{addr}")),
    );
    let publisher = shared::publisher::Publisher::new(config).unwrap();
    let payload: Payload = "{}".parse().unwrap();

    let result = publisher.publish(&test_credentials(), &payload).await;

    assert!(matches!(result, Err(PublishError::Transport(_))));
}
