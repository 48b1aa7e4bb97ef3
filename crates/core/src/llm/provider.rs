//! Provider endpoints and credential lookup.

use ps_protocol::ProviderKind;

/// Wire format spoken by a provider's HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStyle {
    /// `POST /chat/completions` with `choices[].delta.content` stream chunks.
    OpenAiChat,
    /// `POST /v1/messages` with `content_block_delta` stream events.
    AnthropicMessages,
}

/// Where and how to reach a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub url: String,
    pub style: ApiStyle,
}

pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

impl ProviderEndpoint {
    /// Default endpoint for a provider. The mock provider has none.
    pub fn for_provider(provider: ProviderKind) -> Option<Self> {
        let (url, style) = match provider {
            ProviderKind::Groq => (GROQ_CHAT_URL, ApiStyle::OpenAiChat),
            ProviderKind::OpenAi => (OPENAI_CHAT_URL, ApiStyle::OpenAiChat),
            ProviderKind::Anthropic => (ANTHROPIC_MESSAGES_URL, ApiStyle::AnthropicMessages),
            ProviderKind::Mock => return None,
        };
        Some(Self {
            url: url.to_string(),
            style,
        })
    }
}

/// Find the API key for a provider.
///
/// Precedence: an explicit non-empty key, then the variable named by
/// `env_override`, then the provider's default variable.
pub fn resolve_api_key(
    provider: ProviderKind,
    explicit: Option<&str>,
    env_override: Option<&str>,
) -> Option<String> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    env_override
        .into_iter()
        .chain(provider.api_key_env())
        .find_map(|var| std::env::var(var).ok())
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
