//! Requests service.

use std::sync::Arc;
use tracing::instrument;

use super::require;
use crate::client::{RequestDescriptor, RequestDispatcher};
use crate::errors::RagcyResult;
use crate::types::envelope::ResponseEnvelope;

/// Lists the requests made within a session.
#[derive(Debug, Clone)]
pub struct RequestsService {
    dispatcher: Arc<RequestDispatcher>,
}

impl RequestsService {
    /// Creates a new requests service.
    pub fn new(dispatcher: Arc<RequestDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Lists the requests of a session.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn list(&self, session_id: &str) -> RagcyResult<ResponseEnvelope> {
        require(session_id, "session_id")?;

        self.dispatcher
            .dispatch(RequestDescriptor::get(
                "requests.list",
                format!("/requests/session/{}", session_id),
            ))
            .await
    }
}
