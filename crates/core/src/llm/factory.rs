//! Client factory for creating model clients from a selection.

use crate::llm::adapters::{AnthropicAdapter, MockClient, OpenAiCompatAdapter};
use crate::llm::base::{ModelClient, ModelError};
use crate::llm::provider::{ApiStyle, ProviderEndpoint};
use ps_protocol::ModelSelection;
use std::sync::Arc;

/// Factory for creating model clients.
///
/// The provider in the selection decides the adapter:
/// - Groq, OpenAI → `OpenAiCompatAdapter` with the provider's base URL
/// - Anthropic → `AnthropicAdapter`
/// - Mock → `MockClient::price_demo()`
pub struct ClientFactory;

impl ClientFactory {
    /// Create a client for `selection`.
    ///
    /// # Errors
    ///
    /// `ModelError::MissingCredentials` when a real provider is selected
    /// without an API key.
    pub fn create(selection: &ModelSelection) -> Result<Arc<dyn ModelClient>, ModelError> {
        if !selection.has_credentials() {
            return Err(ModelError::MissingCredentials(
                selection.provider.display_name().to_string(),
            ));
        }

        let Some(endpoint) = ProviderEndpoint::for_provider(selection.provider) else {
            return Ok(Arc::new(MockClient::price_demo()));
        };

        let api_key = selection.api_key.trim();
        let client: Arc<dyn ModelClient> = match endpoint.style {
            ApiStyle::OpenAiChat => Arc::new(OpenAiCompatAdapter::new(
                selection.provider,
                endpoint.url,
                api_key,
                selection.model.clone(),
                selection.temperature,
            )),
            ApiStyle::AnthropicMessages => Arc::new(
                AnthropicAdapter::new(api_key, selection.model.clone(), selection.temperature)
                    .with_url(endpoint.url),
            ),
        };

        tracing::debug!(client = %client.describe(), "model client created");
        Ok(client)
    }
}
