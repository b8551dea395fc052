//! Corpus service.

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use super::require;
use crate::client::{RequestDescriptor, RequestDispatcher};
use crate::errors::RagcyResult;
use crate::transport::HttpMethod;
use crate::types::corpus::{CreateCorpusRequest, QueryRequest};
use crate::types::envelope::ResponseEnvelope;

/// Corpus service for creating, listing, updating, deleting and querying
/// corpora.
#[derive(Debug, Clone)]
pub struct CorpusService {
    dispatcher: Arc<RequestDispatcher>,
}

impl CorpusService {
    /// Creates a new corpus service.
    pub fn new(dispatcher: Arc<RequestDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Creates a corpus.
    ///
    /// Unset optional fields are sent as `null`.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateCorpusRequest) -> RagcyResult<ResponseEnvelope> {
        request.validate()?;

        let body = serde_json::to_value(&request)?;
        self.dispatcher
            .dispatch(
                RequestDescriptor::new("corpus.create", HttpMethod::Post, "/corpus").json(body),
            )
            .await
    }

    /// Lists all corpora for the account.
    #[instrument(skip(self))]
    pub async fn list(&self) -> RagcyResult<ResponseEnvelope> {
        self.dispatcher
            .dispatch(RequestDescriptor::get("corpus.list", "/corpus"))
            .await
    }

    /// Updates a corpus with an arbitrary set of fields.
    #[instrument(skip(self, updates), fields(corpus_id = %id))]
    pub async fn update<T>(&self, id: &str, updates: &T) -> RagcyResult<ResponseEnvelope>
    where
        T: Serialize + ?Sized,
    {
        require(id, "id")?;

        let body = serde_json::to_value(updates)?;
        self.dispatcher
            .dispatch(
                RequestDescriptor::new("corpus.update", HttpMethod::Put, format!("/corpus/{}", id))
                    .json(body),
            )
            .await
    }

    /// Deletes a corpus.
    #[instrument(skip(self), fields(corpus_id = %id))]
    pub async fn delete(&self, id: &str) -> RagcyResult<ResponseEnvelope> {
        require(id, "id")?;

        self.dispatcher
            .dispatch(RequestDescriptor::delete("corpus.delete", format!("/corpus/{}", id)))
            .await
    }

    /// Queries a corpus, optionally continuing a session.
    #[instrument(skip(self, request), fields(corpus_id = %request.corpus_id, has_session = request.session_id.is_some()))]
    pub async fn query(&self, request: QueryRequest) -> RagcyResult<ResponseEnvelope> {
        request.validate()?;

        self.dispatcher
            .dispatch(RequestDescriptor::get("corpus.query", request.endpoint()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RagcyError;
    use crate::mocks::{MockAuth, MockResponse, MockTransport};
    use crate::observability::Observability;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service(transport: Arc<MockTransport>) -> CorpusService {
        CorpusService::new(Arc::new(RequestDispatcher::new(
            transport,
            Arc::new(MockAuth::default()),
            Arc::new(Observability::disabled()),
        )))
    }

    #[tokio::test]
    async fn test_create_sends_all_fields() {
        let transport = MockTransport::shared();
        transport.queue(MockResponse::success(json!({"id": "c1"})));

        let envelope = service(transport.clone())
            .create(CreateCorpusRequest::new("support", "Help Center").welcome_message("Hi!"))
            .await
            .unwrap();

        assert_eq!(envelope.data(), Some(&json!({"id": "c1"})));

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/corpus");
        assert_eq!(
            request.json_body(),
            Some(json!({
                "category": "support",
                "name": "Help Center",
                "agentInstruction": null,
                "prompt": null,
                "welcomeMessage": "Hi!"
            }))
        );
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let transport = MockTransport::shared();

        let err = service(transport.clone())
            .create(CreateCorpusRequest::new("support", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, RagcyError::Validation { .. }));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_list() {
        let transport = MockTransport::shared();
        transport.queue(MockResponse::success(json!([{"id": "c1"}, {"id": "c2"}])));

        let envelope = service(transport.clone()).list().await.unwrap();

        let ids: Vec<serde_json::Value> = envelope.data_as().unwrap();
        assert_eq!(ids.len(), 2);
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/corpus");
    }

    #[tokio::test]
    async fn test_update_sends_arbitrary_object() {
        let transport = MockTransport::shared();
        transport.queue(MockResponse::success(json!(null)));

        let updates = json!({"name": "Renamed", "extra": {"flag": true}});
        service(transport.clone())
            .update("c1", &updates)
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.path, "/corpus/c1");
        assert_eq!(request.json_body(), Some(updates));
    }

    #[tokio::test]
    async fn test_delete() {
        let transport = MockTransport::shared();
        transport.queue(MockResponse::success(json!(null)));

        service(transport.clone()).delete("c1").await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.path, "/corpus/c1");
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let transport = MockTransport::shared();
        let err = service(transport.clone()).delete("").await.unwrap_err();
        assert!(matches!(err, RagcyError::Validation { .. }));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_query_encodes_input_and_session() {
        let transport = MockTransport::shared();
        transport.queue(MockResponse::success(json!({"answer": "42"})));

        service(transport.clone())
            .query(QueryRequest::new("c1", "hello world").session("s 1"))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.path,
            "/corpus/query?corpusId=c1&input=hello%20world&sessionId=s%201"
        );
    }

    #[tokio::test]
    async fn test_query_service_failure() {
        let transport = MockTransport::shared();
        transport.queue(MockResponse::failure(Some("Corpus not found")));

        let err = service(transport)
            .query(QueryRequest::new("missing", "hi"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Corpus not found");
    }
}
