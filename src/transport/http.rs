//! HTTP transport implementation.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, ClientBuilder, RequestBuilder};
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use super::{MultipartPart, MultipartRequest, TransportError};

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// PUT request.
    Put,
    /// DELETE request.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP request representation.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint path, starting with `/`, query string included.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Creates a new GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a new POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// HTTP response representation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP transport trait.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Send a multipart form request (always POST).
    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError>;
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransportImpl {
    client: Client,
    base_url: String,
}

impl HttpTransportImpl {
    /// Creates a new HTTP transport.
    ///
    /// When `timeout` is `None` no client-side timeout is applied.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = ClientBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| TransportError::Request {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Builds the full URL for an endpoint path.
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Applies headers, sends the request and collects the response.
    async fn execute(
        &self,
        mut req_builder: RequestBuilder,
        headers: HeaderMap,
    ) -> Result<HttpResponse, TransportError> {
        req_builder = req_builder.headers(headers);

        let response = req_builder.send().await.map_err(map_send_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::InvalidResponse {
                message: e.to_string(),
            })?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Converts request headers into a `HeaderMap`.
///
/// Names are case-insensitive, so each name ends up with a single value.
/// A multipart request keeps the boundary content type set by its form.
fn header_map(
    headers: &HashMap<String, String>,
    multipart: bool,
) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| {
            TransportError::Request {
                message: format!("Invalid header name {}: {}", name, e),
            }
        })?;
        if multipart && name == CONTENT_TYPE {
            continue;
        }
        let value = HeaderValue::from_str(value).map_err(|e| TransportError::Request {
            message: format!("Invalid value for header {}: {}", name, e),
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Classifies a reqwest send failure.
fn map_send_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::Request {
            message: err.to_string(),
        }
    } else {
        TransportError::NoResponse {
            message: err.to_string(),
        }
    }
}

/// Turns a multipart part into its reqwest form counterpart.
fn build_part(form: Form, part: MultipartPart) -> Result<Form, TransportError> {
    match part {
        MultipartPart::Text { name, value } => Ok(form.text(name, value)),
        MultipartPart::File {
            name,
            filename,
            content_type,
            file,
            length,
        } => {
            let body = Body::wrap_stream(ReaderStream::new(file));
            let part = Part::stream_with_length(body, length)
                .file_name(filename)
                .mime_str(&content_type)
                .map_err(|e| TransportError::Request {
                    message: e.to_string(),
                })?;
            Ok(form.part(name, part))
        }
    }
}

#[async_trait]
impl HttpTransport for HttpTransportImpl {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.build_url(&request.path);

        let mut req_builder = self.client.request(request.method.into(), &url);

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let headers = header_map(&request.headers, false)?;
        self.execute(req_builder, headers).await
    }

    #[instrument(skip(self, request), fields(path = %request.path, parts = request.parts.len()))]
    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.build_url(&request.path);

        let mut form = Form::new();
        for part in request.parts {
            form = build_part(form, part)?;
        }

        let headers = header_map(&request.headers, true)?;
        let req_builder = self.client.post(&url).multipart(form);

        self.execute(req_builder, headers).await
    }
}

impl std::fmt::Debug for HttpTransportImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportImpl")
            .field("base_url", &self.base_url)
            .finish()
    }
}
