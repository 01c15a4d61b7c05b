//! Integration tests for the client-credentials token fetcher.

use serde_json::json;
use shared::token::{TokenClient, TokenError, TokenRequest};

use super::common::spawn_mock_with_token;

#[tokio::test]
async fn test_fetch_token_success() {
    let server = spawn_mock_with_token(
        200,
        json!({"access_token": "tok-123", "token_type": "Bearer", "expires_in": "3599"}),
    )
    .await;
    let request = TokenRequest::new("https://api.loganalytics.io", "tenant-1", "client-1", "s3cr3t")
        .with_authority(server.base_url());

    let token = TokenClient::new().fetch_token(&request).await.unwrap();

    assert_eq!(token.access_token, "tok-123");
    assert_eq!(token.token_type.as_deref(), Some("Bearer"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].uri, "/tenant-1/oauth2/token");
    assert_eq!(
        requests[0].header("content-type"),
        "application/x-www-form-urlencoded"
    );
    let body = &requests[0].body;
    assert!(body.contains("grant_type=client_credentials"));
    assert!(body.contains("client_id=client-1"));
    assert!(body.contains("client_secret=s3cr3t"));
    assert!(body.contains("resource=https%3A%2F%2Fapi.loganalytics.io"));
}

#[tokio::test]
async fn test_fetch_token_rejected() {
    let server = spawn_mock_with_token(401, json!({"error": "invalid_client"})).await;
    let request =
        TokenRequest::new("res", "tenant-1", "client-1", "wrong").with_authority(server.base_url());

    let result = TokenClient::new().fetch_token(&request).await;

    assert!(matches!(result, Err(TokenError::Status { status: 401 })));
}

#[tokio::test]
async fn test_fetch_token_missing_field() {
    let server = spawn_mock_with_token(200, json!({"token_type": "Bearer"})).await;
    let request =
        TokenRequest::new("res", "tenant-1", "client-1", "s3cr3t").with_authority(server.base_url());

    let result = TokenClient::new().fetch_token(&request).await;

    assert!(matches!(result, Err(TokenError::MissingToken)));
}
