//! Sessions service.

use std::sync::Arc;
use tracing::instrument;

use super::require;
use crate::client::{RequestDescriptor, RequestDispatcher};
use crate::errors::RagcyResult;
use crate::types::envelope::ResponseEnvelope;

/// Lists chat sessions held against a corpus.
#[derive(Debug, Clone)]
pub struct SessionsService {
    dispatcher: Arc<RequestDispatcher>,
}

impl SessionsService {
    /// Creates a new sessions service.
    pub fn new(dispatcher: Arc<RequestDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Lists the sessions of a corpus.
    #[instrument(skip(self), fields(corpus_id = %corpus_id))]
    pub async fn list(&self, corpus_id: &str) -> RagcyResult<ResponseEnvelope> {
        require(corpus_id, "corpus_id")?;

        self.dispatcher
            .dispatch(RequestDescriptor::get(
                "sessions.list",
                format!("/sessions/corpus/{}", corpus_id),
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockAuth, MockResponse, MockTransport};
    use crate::observability::Observability;
    use serde_json::json;

    #[tokio::test]
    async fn test_list() {
        let transport = MockTransport::shared();
        transport.queue(MockResponse::success(json!([{"id": "s1"}])));

        let service = SessionsService::new(Arc::new(RequestDispatcher::new(
            transport.clone(),
            Arc::new(MockAuth::default()),
            Arc::new(Observability::disabled()),
        )));

        service.list("c1").await.unwrap();
        assert_eq!(transport.last_request().unwrap().path, "/sessions/corpus/c1");
    }
}
