//! Data sources service.

use std::sync::Arc;
use tracing::{debug, instrument};

use super::packager::{DataSourceInput, DataSourcePackager};
use crate::client::{RequestDescriptor, RequestDispatcher};
use crate::errors::RagcyResult;
use crate::services::require;
use crate::transport::HttpMethod;
use crate::types::envelope::ResponseEnvelope;

/// Data sources service for adding, listing and removing the documents
/// and URLs a corpus is built from.
#[derive(Debug, Clone)]
pub struct DataSourcesService {
    dispatcher: Arc<RequestDispatcher>,
    packager: Arc<DataSourcePackager>,
}

impl DataSourcesService {
    /// Creates a new data sources service.
    pub fn new(dispatcher: Arc<RequestDispatcher>, packager: Arc<DataSourcePackager>) -> Self {
        Self {
            dispatcher,
            packager,
        }
    }

    /// Returns the packager used for uploads.
    pub fn packager(&self) -> &DataSourcePackager {
        &self.packager
    }

    /// Adds a data source to a corpus.
    ///
    /// Local files are streamed as multipart uploads; URLs are registered
    /// by value. Returns `Ok(None)` without sending anything when the input
    /// names neither a file nor a URL.
    ///
    /// # Errors
    ///
    /// - [`RagcyError::UnsupportedFileType`](crate::RagcyError::UnsupportedFileType)
    ///   if the file's extension is not accepted
    /// - [`RagcyError::Io`](crate::RagcyError::Io) if the file cannot be read
    #[instrument(skip(self, input), fields(corpus_id = %corpus_id, url = input.url.is_some()))]
    pub async fn add(
        &self,
        corpus_id: &str,
        input: DataSourceInput,
    ) -> RagcyResult<Option<ResponseEnvelope>> {
        if input.is_empty() {
            debug!("No file or URL given, nothing to upload");
            return Ok(None);
        }
        require(corpus_id, "corpus_id")?;

        let Some(payload) = self.packager.package(corpus_id, &input).await? else {
            debug!("No file or URL given, nothing to upload");
            return Ok(None);
        };

        let envelope = self
            .dispatcher
            .dispatch(
                RequestDescriptor::new("datasources.add", HttpMethod::Post, "/datasources")
                    .multipart(payload),
            )
            .await?;

        Ok(Some(envelope))
    }

    /// Lists the data sources of a corpus.
    #[instrument(skip(self), fields(corpus_id = %corpus_id))]
    pub async fn list(&self, corpus_id: &str) -> RagcyResult<ResponseEnvelope> {
        require(corpus_id, "corpus_id")?;

        self.dispatcher
            .dispatch(RequestDescriptor::get(
                "datasources.list",
                format!("/datasources/{}", corpus_id),
            ))
            .await
    }

    /// Removes a data source.
    #[instrument(skip(self), fields(datasource_id = %id))]
    pub async fn remove(&self, id: &str) -> RagcyResult<ResponseEnvelope> {
        require(id, "id")?;

        self.dispatcher
            .dispatch(RequestDescriptor::delete("datasources.remove", format!("/datasources/{}", id)))
            .await
    }
}
