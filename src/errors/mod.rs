//! Error types for the Ragcy client.
//!
//! Every fallible operation returns [`RagcyResult`]. Service-level failures
//! (`success: false`), HTTP status failures, missing responses, upload
//! validation and local I/O all surface as variants of [`RagcyError`].

use thiserror::Error;

/// Result type alias for Ragcy operations.
pub type RagcyResult<T> = Result<T, RagcyError>;

/// Message used when the service reports failure without an `error` field.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong!";

/// Message returned for uploads whose file extension is not allowed.
pub const UNSUPPORTED_FILE_TYPE_MESSAGE: &str =
    "Please upload a JSON, XLS, XLSX, MKV, MP4, MP3, WAV, PDF, TXT, CSV, DOCX, or DOC file";

/// Error type for Ragcy client operations.
#[derive(Debug, Error)]
pub enum RagcyError {
    /// Configuration error (missing API key, invalid base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Request validation failed before anything was sent.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message describing the validation issue.
        message: String,
        /// The parameter that caused the error.
        param: Option<String>,
    },

    /// Upload rejected because of its file extension.
    #[error("{}", UNSUPPORTED_FILE_TYPE_MESSAGE)]
    UnsupportedFileType {
        /// The lowercased extension that was rejected.
        extension: String,
    },

    /// The service answered but reported `success: false`.
    #[error("{message}")]
    Service {
        /// The service's `error` field, or the generic fallback.
        message: String,
    },

    /// The service answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The request was sent but no response came back.
    #[error("No response received from the server")]
    NoResponse {
        /// Underlying transport message.
        message: String,
    },

    /// The request could not be built or sent.
    #[error("Request error: {message}")]
    Request {
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Local file error while packaging an upload.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RagcyError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        RagcyError::Validation {
            message: message.into(),
            param: None,
        }
    }

    /// Creates a validation error naming the offending parameter.
    pub fn validation_param(message: impl Into<String>, param: impl Into<String>) -> Self {
        RagcyError::Validation {
            message: message.into(),
            param: Some(param.into()),
        }
    }

    /// Creates a service error, falling back to the generic message.
    pub fn service(message: Option<String>) -> Self {
        RagcyError::Service {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }

    /// Returns the HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RagcyError::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Short, stable name of the error kind, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RagcyError::Configuration { .. } => "configuration",
            RagcyError::Validation { .. } => "validation",
            RagcyError::UnsupportedFileType { .. } => "unsupported_file_type",
            RagcyError::Service { .. } => "service",
            RagcyError::HttpStatus { .. } => "http_status",
            RagcyError::NoResponse { .. } => "no_response",
            RagcyError::Request { .. } => "request",
            RagcyError::Serialization { .. } => "serialization",
            RagcyError::Io(_) => "io",
        }
    }
}

impl From<serde_json::Error> for RagcyError {
    fn from(err: serde_json::Error) -> Self {
        RagcyError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for RagcyError {
    fn from(err: url::ParseError) -> Self {
        RagcyError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
