//! Mock implementations for testing.
//!
//! Provides a mock transport and auth provider so services can be tested
//! without a network. Multipart uploads are drained on receipt, so tests
//! can assert on exactly what would have been streamed.

use async_trait::async_trait;
use futures::TryStreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::io::ReaderStream;

use crate::auth::AuthProvider;
use crate::errors::RagcyError;
use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, MultipartRequest,
    TransportError,
};

/// A recorded multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedPart {
    /// Text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field with the bytes that were streamed.
    File {
        /// Field name.
        name: String,
        /// File name.
        filename: String,
        /// Content type.
        content_type: String,
        /// Declared length.
        length: u64,
        /// Streamed contents.
        data: Vec<u8>,
    },
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint path, query string included.
    pub path: String,
    /// Request body, for non-multipart requests.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Multipart parts, for multipart requests.
    pub parts: Option<Vec<RecordedPart>>,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }

    /// Returns the value of a multipart text field.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.parts.as_ref()?.iter().find_map(|p| match p {
            RecordedPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a 200 response with a JSON body.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
        }
    }

    /// Creates a `{"success": true, "data": ...}` response.
    pub fn success(data: serde_json::Value) -> Self {
        Self::json(&serde_json::json!({ "success": true, "data": data }))
    }

    /// Creates a `{"success": false}` response, with `error` when given.
    pub fn failure(error: Option<&str>) -> Self {
        match error {
            Some(message) => Self::json(&serde_json::json!({ "success": false, "error": message })),
            None => Self::json(&serde_json::json!({ "success": false })),
        }
    }

    /// Creates an empty response with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Replaces the status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Replaces the body with raw bytes.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Mock HTTP transport for testing.
pub struct MockTransport {
    outcomes: Mutex<Vec<Result<MockResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Creates a new mock transport behind an `Arc`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.outcomes).push(Ok(response));
    }

    /// Queues a transport failure.
    pub fn queue_error(&self, error: TransportError) {
        lock(&self.outcomes).push(Err(error));
    }

    /// Sets the response used when the queue is empty.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_outcome(&self) -> Result<HttpResponse, TransportError> {
        let mut outcomes = lock(&self.outcomes);
        let outcome = if outcomes.is_empty() {
            Ok(lock(&self.default_response)
                .clone()
                .unwrap_or_else(|| MockResponse::status(500)))
        } else {
            outcomes.remove(0)
        };

        outcome.map(|response| HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

async fn drain(part: MultipartPart) -> Result<RecordedPart, TransportError> {
    match part {
        MultipartPart::Text { name, value } => Ok(RecordedPart::Text { name, value }),
        MultipartPart::File {
            name,
            filename,
            content_type,
            file,
            length,
        } => {
            let data = ReaderStream::new(file)
                .try_fold(Vec::new(), |mut acc, chunk| async move {
                    acc.extend_from_slice(&chunk);
                    Ok::<_, std::io::Error>(acc)
                })
                .await
                .map_err(|e| TransportError::Request {
                    message: e.to_string(),
                })?;

            Ok(RecordedPart::File {
                name,
                filename,
                content_type,
                length,
                data,
            })
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            path: request.path,
            body: request.body,
            headers: request.headers,
            parts: None,
        });

        self.next_outcome()
    }

    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        let mut parts = Vec::with_capacity(request.parts.len());
        for part in request.parts {
            parts.push(drain(part).await?);
        }

        lock(&self.requests).push(RecordedRequest {
            method: HttpMethod::Post,
            path: request.path,
            body: None,
            headers: request.headers,
            parts: Some(parts),
        });

        self.next_outcome()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Mock auth provider for testing.
pub struct MockAuth {
    api_key: String,
}

impl MockAuth {
    /// Creates a new mock auth provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::new("rk_mock_test_key")
    }
}

impl AuthProvider for MockAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        );
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn validate(&self) -> Result<(), RagcyError> {
        Ok(())
    }
}

impl std::fmt::Debug for MockAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuth").finish()
    }
}
