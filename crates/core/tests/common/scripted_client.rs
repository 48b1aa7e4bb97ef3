//! A model client that replays fixed chunks per task.

#![allow(dead_code)]

use async_trait::async_trait;
use ps_core::llm::{CompletionRequest, ModelClient, ModelError, ModelEvent, ModelEventStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replays `replies[n]` for the n-th completion, split into the given chunks.
///
/// Requests are recorded so tests can check prompts and context passing.
pub struct ScriptedClient {
    replies: Vec<Vec<String>>,
    calls: AtomicUsize,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Vec<&str>>) -> Self {
        Self {
            replies: replies
                .into_iter()
                .map(|chunks| chunks.into_iter().map(str::to_string).collect())
                .collect(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    fn describe(&self) -> String {
        "Scripted/test".to_string()
    }

    async fn check_availability(&self) -> bool {
        true
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<ModelEventStream, ModelError> {
        self.requests.lock().unwrap().push(request.clone());
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let chunks = self.replies.get(call).cloned().unwrap_or_default();

        let mut events: Vec<Result<ModelEvent, ModelError>> =
            chunks.into_iter().map(|c| Ok(ModelEvent::Chunk(c))).collect();
        events.push(Ok(ModelEvent::Completed));
        Ok(Box::pin(tokio_stream::iter(events)))
    }
}
