//! Base ModelClient trait and supporting types.

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// A single completion request: a system prompt plus one user prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Role description (who the model is and what it wants).
    pub system_prompt: String,

    /// The task instruction, including any upstream context.
    pub prompt: String,

    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request with the given prompt.
    ///
    /// Defaults:
    /// - system_prompt: empty
    /// - max_tokens: 2048
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: String::new(),
            prompt: prompt.into(),
            max_tokens: 2048,
        }
    }

    /// Set the system prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set the token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// A piece of generated text.
    Chunk(String),
    Completed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Model client not available: {0}")]
    NotAvailable(String),
    #[error("Missing API key for {0}")]
    MissingCredentials(String),
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Stream parsing error: {0}")]
    StreamParse(String),
}

/// Stream of events produced by one completion.
pub type ModelEventStream = Pin<Box<dyn Stream<Item = Result<ModelEvent, ModelError>> + Send>>;

#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Short label for logs, e.g. `groq/llama3-70b-8192`.
    fn describe(&self) -> String;

    async fn check_availability(&self) -> bool;

    async fn complete(&self, request: &CompletionRequest) -> Result<ModelEventStream, ModelError>;
}
