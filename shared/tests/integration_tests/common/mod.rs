//! Common test utilities and helpers for integration tests.
//!
//! Provides a recording mock server that answers every request with a fixed
//! status, plus publisher and credential fixtures pointed at it.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use shared::config::IngestionEndpoint;
use shared::models::Credentials;
use shared::publisher::{Publisher, PublisherConfig};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Shared key used by every fixture: base64 of `testkey`.
pub const TEST_KEY: &str = "dGVzdGtleQ==";

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request path and query.
    pub uri: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Raw body text.
    pub body: String,
}

impl CapturedRequest {
    /// Returns a header as a string, panicking if it is missing.
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .unwrap_or_else(|| panic!("missing header {name}"))
            .to_str()
            .unwrap()
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    token_body: Value,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// A running mock endpoint.
pub struct MockServer {
    /// Address the server listens on.
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockServer {
    /// Base URL of the server, e.g. `http://127.0.0.1:40123`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    state.requests.lock().unwrap().push(CapturedRequest {
        uri: uri.to_string(),
        headers,
        body,
    });
    state.status
}

async fn record_token(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(CapturedRequest {
        uri: uri.to_string(),
        headers,
        body,
    });
    (state.status, Json(state.token_body.clone()))
}

/// Starts a mock server answering every ingestion and token request with `status`.
pub async fn spawn_mock(status: u16) -> MockServer {
    spawn_mock_with_token(status, serde_json::json!({})).await
}

/// Starts a mock server whose token endpoint returns `token_body`.
pub async fn spawn_mock_with_token(status: u16, token_body: Value) -> MockServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status: StatusCode::from_u16(status).unwrap(),
        token_body,
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/api/logs", post(record))
        .route("/{tenant}/oauth2/token", post(record_token))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer { addr, requests }
}

/// Creates a publisher that sends to `server`.
pub fn publisher_for(server: &MockServer) -> Publisher {
    let config = PublisherConfig::default()
        .with_endpoint(IngestionEndpoint::default().with_base_url(server.base_url()));
    Publisher::new(config).unwrap()
}

/// Credentials using [`TEST_KEY`].
pub fn test_credentials() -> Credentials {
    Credentials::new("test-workspace", TEST_KEY, "IntegrationTest")
}
