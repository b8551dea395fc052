//! Shared helpers for integration tests against a WireMock server.

#![allow(dead_code)]

use ragcy_client::RagcyClient;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API key used by every test client.
pub const TEST_API_KEY: &str = "rk_integration_key";

/// Starts a fresh mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Builds a client pointed at the mock server.
pub fn client_for(server: &MockServer) -> RagcyClient {
    RagcyClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .build()
        .expect("Failed to build client")
}

/// A mock that only matches authenticated requests.
pub fn mock_with_auth(method_matcher: &str, path_matcher: &str) -> wiremock::MockBuilder {
    Mock::given(method(method_matcher))
        .and(path(path_matcher))
        .and(header("Authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
}

/// `{"success": true, "data": ...}` with status 200.
pub fn success_response(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

/// `{"success": false, ...}` with status 200.
pub fn failure_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}
