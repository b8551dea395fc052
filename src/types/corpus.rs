//! Corpus request types.

use serde::Serialize;

use crate::errors::{RagcyError, RagcyResult};

/// Request body for creating a corpus.
///
/// Optional fields are always sent, as `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCorpusRequest {
    /// Corpus category.
    pub category: String,
    /// Corpus name.
    pub name: String,
    /// Instructions for the agent answering queries.
    pub agent_instruction: Option<String>,
    /// Prompt used for the corpus.
    pub prompt: Option<String>,
    /// Message shown when a session starts.
    pub welcome_message: Option<String>,
}

impl CreateCorpusRequest {
    /// Creates a request with the required fields.
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            agent_instruction: None,
            prompt: None,
            welcome_message: None,
        }
    }

    /// Sets the welcome message.
    pub fn welcome_message(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = Some(message.into());
        self
    }

    /// Sets the agent instruction.
    pub fn agent_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.agent_instruction = Some(instruction.into());
        self
    }

    /// Sets the prompt.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Validates the request.
    pub fn validate(&self) -> RagcyResult<()> {
        if self.category.is_empty() {
            return Err(RagcyError::validation_param("Category is required", "category"));
        }
        if self.name.is_empty() {
            return Err(RagcyError::validation_param("Name is required", "name"));
        }
        Ok(())
    }
}

/// A query against a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Corpus to query.
    pub corpus_id: String,
    /// User input.
    pub input: String,
    /// Session to continue, if any.
    pub session_id: Option<String>,
}

impl QueryRequest {
    /// Creates a query that starts a new session.
    pub fn new(corpus_id: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            corpus_id: corpus_id.into(),
            input: input.into(),
            session_id: None,
        }
    }

    /// Continues an existing session.
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Validates the request.
    ///
    /// Only the corpus id is required; an empty input is sent as `input=`.
    pub fn validate(&self) -> RagcyResult<()> {
        if self.corpus_id.is_empty() {
            return Err(RagcyError::validation_param("Corpus ID is required", "corpus_id"));
        }
        Ok(())
    }

    /// Builds the endpoint path with its percent-encoded query string.
    pub fn endpoint(&self) -> String {
        let mut path = format!(
            "/corpus/query?corpusId={}&input={}",
            urlencoding::encode(&self.corpus_id),
            urlencoding::encode(&self.input)
        );

        if let Some(session_id) = self.session_id.as_deref().filter(|s| !s.is_empty()) {
            path.push_str("&sessionId=");
            path.push_str(&urlencoding::encode(session_id));
        }

        path
    }
}
