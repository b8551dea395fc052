//! Service implementations for the Ragcy API.
//!
//! Each service groups the operations for one resource: corpora, data
//! sources, sessions and requests. They build request descriptors and hand
//! them to the shared dispatcher.

mod corpus;
mod datasources;
mod requests;
mod sessions;

pub use corpus::CorpusService;
pub use datasources::{
    DataSourceInput, DataSourcePackager, DataSourcePayload, DataSourcesService, FileAttachment,
    ALLOWED_EXTENSIONS, URL_SOURCE_TYPE,
};
pub use requests::RequestsService;
pub use sessions::SessionsService;

use crate::errors::{RagcyError, RagcyResult};

/// Rejects empty identifiers and inputs before anything is sent.
pub(crate) fn require(value: &str, param: &str) -> RagcyResult<()> {
    if value.is_empty() {
        return Err(RagcyError::validation_param(
            format!("{} is required", param),
            param,
        ));
    }
    Ok(())
}
