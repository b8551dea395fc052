//! Ragcy Client Library
//!
//! An async Rust client for the Ragcy retrieval-augmented generation
//! service. Create and query corpora, feed them documents or URLs, and
//! browse the sessions and requests they have served.
//!
//! # Features
//!
//! - **Corpora**: create, list, update, delete and query
//! - **Data sources**: streamed multipart uploads of local files, URL registration
//! - **Sessions & requests**: history listings per corpus and session
//! - **Observability**: tracing spans, structured logging, request metrics
//! - **Pluggable seams**: custom transports, auth providers, loggers and collectors
//!
//! Every call is answered with the service's `{ success, data, error }`
//! envelope. Successful envelopes are returned as-is; anything else becomes
//! a [`RagcyError`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ragcy_client::{CreateCorpusRequest, DataSourceInput, QueryRequest, RagcyClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RagcyClient::builder()
//!         .api_key("rk_your_api_key")
//!         .build()?;
//!
//!     let created = client
//!         .corpus()
//!         .create(CreateCorpusRequest::new("support", "Help Center"))
//!         .await?;
//!     let corpus_id: String = created.data_as::<serde_json::Value>()?["id"]
//!         .as_str()
//!         .unwrap_or_default()
//!         .to_string();
//!
//!     client
//!         .data_sources()
//!         .add(&corpus_id, DataSourceInput::url("https://example.com/faq"))
//!         .await?;
//!
//!     let answer = client
//!         .corpus()
//!         .query(QueryRequest::new(&corpus_id, "How do I reset my password?"))
//!         .await?;
//!     println!("{:?}", answer.data());
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use ragcy_client::{DataSourceInput, RagcyClient, RagcyError};
//!
//! # async fn run(client: RagcyClient) {
//! match client.data_sources().add("corpus_123", DataSourceInput::file("setup.exe")).await {
//!     Ok(Some(envelope)) => println!("added: {:?}", envelope.data()),
//!     Ok(None) => println!("nothing to upload"),
//!     Err(RagcyError::UnsupportedFileType { extension }) => eprintln!("rejected .{}", extension),
//!     Err(e) => eprintln!("{}", e),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{RagcyClient, RagcyClientBuilder, RequestDescriptor, RequestDispatcher};
pub use config::RagcyConfig;
pub use errors::{RagcyError, RagcyResult};
pub use services::{DataSourceInput, DataSourcePackager, DataSourcePayload};

// Type re-exports
pub use types::corpus::{CreateCorpusRequest, QueryRequest};
pub use types::envelope::ResponseEnvelope;

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
