//! Adapter for OpenAI-compatible chat completion APIs (OpenAI and Groq).

use crate::llm::adapters::sse::SseDecoder;
use crate::llm::base::{CompletionRequest, ModelClient, ModelError, ModelEvent, ModelEventStream};
use async_stream::stream;
use async_trait::async_trait;
use ps_protocol::ProviderKind;
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;

/// Streams completions from a `/chat/completions` endpoint.
pub struct OpenAiCompatAdapter {
    provider: ProviderKind,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    http: reqwest::Client,
}

impl OpenAiCompatAdapter {
    /// Create a new adapter.
    ///
    /// # Arguments
    ///
    /// * `provider` - Which provider the endpoint belongs to (for logs and errors)
    /// * `url` - Full `/chat/completions` URL
    /// * `api_key` - Bearer token
    /// * `model` - Model name, e.g. `llama3-70b-8192`
    /// * `temperature` - Sampling temperature
    pub fn new(
        provider: ProviderKind,
        url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            http: reqwest::Client::new(),
        }
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &request.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: request.max_tokens,
            stream: true,
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiCompatAdapter {
    fn describe(&self) -> String {
        format!("{}/{}", self.provider.display_name(), self.model)
    }

    async fn check_availability(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<ModelEventStream, ModelError> {
        if !self.check_availability().await {
            return Err(ModelError::MissingCredentials(
                self.provider.display_name().to_string(),
            ));
        }

        tracing::debug!(client = %self.describe(), url = %self.url, "sending chat completion request");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| ModelError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, message });
        }

        let mut bytes = response.bytes_stream();
        let events = stream! {
            let mut decoder = SseDecoder::new();
            'read: while let Some(item) = bytes.next().await {
                let chunk = match item {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(ModelError::Http(e.to_string()));
                        break 'read;
                    }
                };

                for payload in decoder.push(&chunk) {
                    match parse_chat_payload(&payload) {
                        Ok(ChatPayload::Done) => break 'read,
                        Ok(ChatPayload::Text(pieces)) => {
                            for piece in pieces {
                                yield Ok(ModelEvent::Chunk(piece));
                            }
                        }
                        Err(e) => {
                            yield Err(e);
                            break 'read;
                        }
                    }
                }
            }
            yield Ok(ModelEvent::Completed);
        };

        Ok(Box::pin(events))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum ChatPayload {
    Text(Vec<String>),
    Done,
}

/// Interpret one `data:` payload of a chat completion stream.
fn parse_chat_payload(payload: &str) -> Result<ChatPayload, ModelError> {
    if payload == "[DONE]" {
        return Ok(ChatPayload::Done);
    }

    let chunk: ChatChunk = serde_json::from_str(payload)
        .map_err(|e| ModelError::StreamParse(format!("{e} (payload: {payload})")))?;

    Ok(ChatPayload::Text(
        chunk
            .choices
            .into_iter()
            .filter_map(|choice| choice.delta.content)
            .filter(|text| !text.is_empty())
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(api_key: &str) -> OpenAiCompatAdapter {
        OpenAiCompatAdapter::new(
            ProviderKind::Groq,
            "http://localhost/chat/completions",
            api_key,
            "llama3-70b-8192",
            0.7,
        )
    }

    #[test]
    fn test_build_request_includes_system_prompt() {
        let adapter = adapter("gsk-test");
        let request = CompletionRequest::new("Find a kettle").with_system_prompt("You are helpful.");

        let body = serde_json::to_value(adapter.build_request(&request)).unwrap();

        assert_eq!(body["model"], "llama3-70b-8192");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Find a kettle");
    }

    #[test]
    fn test_build_request_without_system_prompt() {
        let adapter = adapter("gsk-test");
        let body = serde_json::to_value(adapter.build_request(&CompletionRequest::new("hi"))).unwrap();

        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_parse_chat_payload() {
        let payload = r#"{"choices":[{"index":0,"delta":{"content":"price: 19.99"}}]}"#;
        assert_eq!(
            parse_chat_payload(payload).unwrap(),
            ChatPayload::Text(vec!["price: 19.99".to_string()])
        );

        let role_only = r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_chat_payload(role_only).unwrap(), ChatPayload::Text(vec![]));

        assert_eq!(parse_chat_payload("[DONE]").unwrap(), ChatPayload::Done);
        assert!(matches!(
            parse_chat_payload("not json"),
            Err(ModelError::StreamParse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_reported() {
        let adapter = adapter("   ");
        assert!(!adapter.check_availability().await);

        let result = adapter.complete(&CompletionRequest::new("hi")).await;
        assert!(matches!(result, Err(ModelError::MissingCredentials(_))));
    }

    #[test]
    fn test_describe() {
        assert_eq!(adapter("k").describe(), "Groq/llama3-70b-8192");
    }
}
