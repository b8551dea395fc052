//! HTTP transport layer for the Ragcy client.
//!
//! Provides the HTTP transport abstraction and the reqwest-backed
//! implementation, including streamed multipart uploads.

mod http;

pub use self::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::collections::HashMap;

/// Multipart request for file uploads.
///
/// No content type is set here: the transport derives
/// `multipart/form-data; boundary=...` from the assembled form.
#[derive(Debug)]
pub struct MultipartRequest {
    /// Endpoint path, starting with `/`.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Multipart form parts, in wire order.
    pub parts: Vec<MultipartPart>,
}

/// A part of a multipart form.
#[derive(Debug)]
pub enum MultipartPart {
    /// Text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field, streamed from disk.
    File {
        /// Field name.
        name: String,
        /// File name sent in the part's disposition.
        filename: String,
        /// Content type.
        content_type: String,
        /// Open handle to the file.
        file: tokio::fs::File,
        /// File length in bytes.
        length: u64,
    },
}

impl MultipartPart {
    /// Creates a text part.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        MultipartPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the field name of this part.
    pub fn name(&self) -> &str {
        match self {
            MultipartPart::Text { name, .. } | MultipartPart::File { name, .. } => name,
        }
    }
}

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built (bad header, bad URL, bad part).
    #[error("Request error: {message}")]
    Request {
        /// Error message.
        message: String,
    },

    /// The request went out but no response came back.
    #[error("No response: {message}")]
    NoResponse {
        /// Error message.
        message: String,
    },

    /// The response body could not be read.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}
