//! Mock model client for tests and offline demos.

use crate::llm::base::{CompletionRequest, ModelClient, ModelError, ModelEvent, ModelEventStream};
use async_trait::async_trait;

#[derive(Debug, Clone)]
enum Script {
    /// Replay the same events for every request.
    Fixed(Vec<Result<ModelEvent, ModelError>>),
    /// Answer the built-in price comparison tasks by keyword.
    PriceDemo,
}

#[derive(Debug, Clone)]
pub struct MockClient {
    available: bool,
    script: Script,
}

impl MockClient {
    pub fn new(available: bool, events: Vec<Result<ModelEvent, ModelError>>) -> Self {
        Self {
            available,
            script: Script::Fixed(events),
        }
    }

    pub fn success() -> Self {
        Self::new(
            true,
            vec![
                Ok(ModelEvent::Chunk("Mock ".to_string())),
                Ok(ModelEvent::Chunk("response".to_string())),
                Ok(ModelEvent::Completed),
            ],
        )
    }

    pub fn unavailable() -> Self {
        Self::new(false, vec![])
    }

    pub fn failing() -> Self {
        Self::new(
            true,
            vec![
                Ok(ModelEvent::Chunk("Starting...".to_string())),
                Err(ModelError::Api {
                    status: 500,
                    message: "Mock failure".to_string(),
                }),
            ],
        )
    }

    /// Deterministic answers for the optimize/retrieve/analyze tasks, streamed line by line.
    pub fn price_demo() -> Self {
        Self {
            available: true,
            script: Script::PriceDemo,
        }
    }
}

#[async_trait]
impl ModelClient for MockClient {
    fn describe(&self) -> String {
        "Mock/mock-scripted".to_string()
    }

    async fn check_availability(&self) -> bool {
        self.available
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<ModelEventStream, ModelError> {
        if !self.available {
            return Err(ModelError::NotAvailable("Mock client not available".to_string()));
        }

        let events = match &self.script {
            Script::Fixed(events) => events.clone(),
            Script::PriceDemo => {
                let mut events: Vec<_> = split_lines(&demo_reply(&request.prompt))
                    .into_iter()
                    .map(|line| Ok(ModelEvent::Chunk(line)))
                    .collect();
                events.push(Ok(ModelEvent::Completed));
                events
            }
        };

        Ok(Box::pin(tokio_stream::iter(events)))
    }
}

fn demo_reply(prompt: &str) -> String {
    let lower = prompt.to_lowercase();

    if lower.contains("optimize the search query") {
        let product = quoted(prompt).unwrap_or("the product");
        format!("\"{product}\" new, official seller, compare exact model number\n")
    } else if lower.contains("retrieve price data") {
        [
            "Amazon: wireless model, price: 349.99",
            "AliExpress: same model, import shipping, price: 289.50",
            "Kuwaiti store: local warranty included, price: 329.00",
            "",
        ]
        .join("\n")
    } else if lower.contains("analyze") {
        [
            "AliExpress is the cheapest at price: 289.50 but ships slowly.",
            "The best deal overall is the Kuwaiti store with local warranty.",
            "",
        ]
        .join("\n")
    } else {
        "No scripted answer for this task.\n".to_string()
    }
}

/// Text between the first pair of single quotes.
fn quoted(text: &str) -> Option<&str> {
    let start = text.find('\'')? + 1;
    let len = text[start..].find('\'')?;
    Some(&text[start..start + len])
}

/// Split into lines, each keeping its newline.
fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n')
        .map(str::to_string)
        .collect()
}
