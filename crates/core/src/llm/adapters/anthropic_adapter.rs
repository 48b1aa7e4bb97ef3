//! Adapter for the Anthropic messages API.

use crate::llm::adapters::sse::SseDecoder;
use crate::llm::base::{CompletionRequest, ModelClient, ModelError, ModelEvent, ModelEventStream};
use crate::llm::provider::{ANTHROPIC_API_VERSION, ANTHROPIC_MESSAGES_URL};
use async_stream::stream;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;

/// Streams completions from `/v1/messages`.
pub struct AnthropicAdapter {
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    http: reqwest::Client,
}

impl AnthropicAdapter {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            url: ANTHROPIC_MESSAGES_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            http: reqwest::Client::new(),
        }
    }

    /// Point the adapter at a different endpoint (proxies, tests).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: (!request.system_prompt.is_empty()).then_some(request.system_prompt.as_str()),
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
            temperature: self.temperature,
            stream: true,
        }
    }
}

#[async_trait]
impl ModelClient for AnthropicAdapter {
    fn describe(&self) -> String {
        format!("Anthropic/{}", self.model)
    }

    async fn check_availability(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<ModelEventStream, ModelError> {
        if !self.check_availability().await {
            return Err(ModelError::MissingCredentials("Anthropic".to_string()));
        }

        tracing::debug!(client = %self.describe(), "sending messages request");

        let response = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
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
                    match parse_stream_event(&payload) {
                        Ok(Some(ModelEvent::Completed)) => break 'read,
                        Ok(Some(event)) => yield Ok(event),
                        Ok(None) => {}
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
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum StreamEvent {
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta { delta: Delta },
    #[serde(rename = "message_stop")]
    MessageStop,
    #[serde(rename = "error")]
    Error { error: ApiErrorBody },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

/// Interpret one `data:` payload; `None` for events carrying no text.
fn parse_stream_event(payload: &str) -> Result<Option<ModelEvent>, ModelError> {
    let event: StreamEvent = serde_json::from_str(payload)
        .map_err(|e| ModelError::StreamParse(format!("{e} (payload: {payload})")))?;

    match event {
        StreamEvent::ContentBlockDelta { delta } => Ok(delta
            .text
            .filter(|text| !text.is_empty())
            .map(ModelEvent::Chunk)),
        StreamEvent::MessageStop => Ok(Some(ModelEvent::Completed)),
        StreamEvent::Error { error } => Err(ModelError::Api {
            status: 500,
            message: format!("{}: {}", error.kind, error.message),
        }),
        StreamEvent::Other => Ok(None),
    }
}
