//! Shared request dispatch.
//!
//! Every service call ends up here. The dispatcher attaches credentials,
//! encodes the payload, performs exactly one HTTP call and folds the result
//! into either a successful [`ResponseEnvelope`] or a [`RagcyError`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::auth::AuthProvider;
use crate::errors::{RagcyError, RagcyResult};
use crate::observability::{Observability, RequestTimer};
use crate::services::DataSourcePayload;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartRequest, TransportError};
use crate::types::envelope::ResponseEnvelope;

/// Body of a dispatched request.
#[derive(Debug)]
pub enum RequestPayload {
    /// Sent as `application/json`.
    Json(Value),
    /// Sent as `multipart/form-data`, boundary chosen by the transport.
    Multipart(DataSourcePayload),
}

/// Headers owned by the dispatcher. Custom headers with these names are
/// dropped, compared case-insensitively.
pub const RESERVED_HEADERS: [&str; 2] = ["authorization", "content-type"];

/// Returns true if `name` is one of [`RESERVED_HEADERS`], ignoring case.
pub fn is_reserved_header(name: &str) -> bool {
    RESERVED_HEADERS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name.trim()))
}

/// One outgoing call: operation name, method, endpoint and optional payload.
#[derive(Debug)]
pub struct RequestDescriptor {
    /// Route-level name used in logs and metrics, e.g. `corpus.delete`.
    ///
    /// Never contains ids, so metric keys stay bounded.
    pub operation: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint path relative to the base URL, starting with `/`.
    pub endpoint: String,
    /// Request payload.
    pub payload: Option<RequestPayload>,
}

impl RequestDescriptor {
    /// Creates a descriptor without a payload.
    pub fn new(operation: &'static str, method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            operation,
            method,
            endpoint: endpoint.into(),
            payload: None,
        }
    }

    /// Creates a GET descriptor.
    pub fn get(operation: &'static str, endpoint: impl Into<String>) -> Self {
        Self::new(operation, HttpMethod::Get, endpoint)
    }

    /// Creates a DELETE descriptor.
    pub fn delete(operation: &'static str, endpoint: impl Into<String>) -> Self {
        Self::new(operation, HttpMethod::Delete, endpoint)
    }

    /// Attaches a JSON payload.
    pub fn json(mut self, body: Value) -> Self {
        self.payload = Some(RequestPayload::Json(body));
        self
    }

    /// Attaches a multipart payload.
    pub fn multipart(mut self, payload: DataSourcePayload) -> Self {
        self.payload = Some(RequestPayload::Multipart(payload));
        self
    }

    /// Returns true if the payload is a multipart upload.
    pub fn is_multipart(&self) -> bool {
        matches!(self.payload, Some(RequestPayload::Multipart(_)))
    }
}

/// Executes request descriptors against the configured transport.
pub struct RequestDispatcher {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    observability: Arc<Observability>,
    custom_headers: Vec<(String, String)>,
}

impl RequestDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        observability: Arc<Observability>,
    ) -> Self {
        Self {
            transport,
            auth,
            observability,
            custom_headers: Vec::new(),
        }
    }

    /// Adds headers sent with every request.
    ///
    /// `Authorization` and `Content-Type` are owned by the dispatcher; custom
    /// headers with those names are dropped in any letter case.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.custom_headers = headers
            .into_iter()
            .filter(|(name, _)| {
                let reserved = is_reserved_header(name);
                if reserved {
                    warn!(header = %name, "Ignoring custom header owned by the client");
                }
                !reserved
            })
            .collect();
        self
    }

    /// Returns the observability facade requests are reported to.
    pub fn observability(&self) -> &Arc<Observability> {
        &self.observability
    }

    /// Sends one request and returns the service's success envelope.
    ///
    /// # Errors
    ///
    /// - [`RagcyError::HttpStatus`] for non-2xx responses
    /// - [`RagcyError::Service`] when the envelope's `success` is falsy
    /// - [`RagcyError::NoResponse`] when nothing came back
    /// - [`RagcyError::Request`] when the request could not be built
    #[instrument(
        name = "ragcy.dispatch",
        skip(self, descriptor),
        fields(operation = descriptor.operation, method = %descriptor.method, endpoint = %descriptor.endpoint, multipart = descriptor.is_multipart())
    )]
    pub async fn dispatch(&self, descriptor: RequestDescriptor) -> RagcyResult<ResponseEnvelope> {
        let timer = RequestTimer::new(descriptor.operation);
        let result = self.execute(descriptor, timer.operation()).await;

        match &result {
            Ok(_) => {
                debug!(elapsed_ms = timer.elapsed().as_millis(), "Request succeeded");
                self.observability
                    .record_success(timer.operation(), timer.elapsed());
            }
            Err(e) => {
                debug!(error = %e, kind = e.kind(), "Request failed");
                self.observability
                    .record_failure(timer.operation(), timer.elapsed(), e.kind());
            }
        }

        result
    }

    async fn execute(
        &self,
        descriptor: RequestDescriptor,
        operation: &str,
    ) -> RagcyResult<ResponseEnvelope> {
        if !descriptor.endpoint.starts_with('/') {
            return Err(RagcyError::validation_param(
                format!("Endpoint must begin with '/': {}", descriptor.endpoint),
                "endpoint",
            ));
        }

        let mut headers: HashMap<String, String> = self.custom_headers.iter().cloned().collect();
        self.auth.apply_auth(&mut headers);

        let response = match descriptor.payload {
            Some(RequestPayload::Multipart(payload)) => {
                if descriptor.method != HttpMethod::Post {
                    return Err(RagcyError::validation_param(
                        "Multipart payloads must be sent with POST",
                        "method",
                    ));
                }

                if let Some(attachment) = &payload.attachment {
                    self.observability.record_upload(attachment.length);
                }
                self.observability.log_request(operation, None);

                self.transport
                    .send_multipart(MultipartRequest {
                        path: descriptor.endpoint,
                        headers,
                        parts: payload.into_parts(),
                    })
                    .await
            }
            payload => {
                headers.insert(
                    "Content-Type".to_string(),
                    mime::APPLICATION_JSON.as_ref().to_string(),
                );

                let body = match payload {
                    Some(RequestPayload::Json(value)) => Some(serde_json::to_vec(&value)?),
                    _ => None,
                };
                self.observability.log_request(operation, body.as_deref());

                self.transport
                    .send(HttpRequest {
                        method: descriptor.method,
                        path: descriptor.endpoint,
                        headers,
                        body,
                    })
                    .await
            }
        }
        .map_err(map_transport_error)?;

        self.observability
            .log_response(operation, response.status, &response.body);

        interpret(&response)
    }
}

impl std::fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("custom_headers", &self.custom_headers.len())
            .finish()
    }
}

fn map_transport_error(error: TransportError) -> RagcyError {
    match error {
        TransportError::Request { message } => RagcyError::Request { message },
        TransportError::NoResponse { message } | TransportError::InvalidResponse { message } => {
            RagcyError::NoResponse { message }
        }
    }
}

/// Folds an HTTP response into the success envelope or an error.
fn interpret(response: &HttpResponse) -> RagcyResult<ResponseEnvelope> {
    if !response.is_success() {
        return Err(RagcyError::HttpStatus {
            status: response.status,
        });
    }

    let envelope: ResponseEnvelope = response.json()?;

    if envelope.is_success() {
        Ok(envelope)
    } else {
        Err(RagcyError::service(envelope.error_message()))
    }
}
