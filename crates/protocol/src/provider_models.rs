//! Model provider selection.
//!
//! Providers are interchangeable: each is identified only by an endpoint, a
//! credential, a model name and a sampling temperature.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// A language-model provider the user can pick.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Groq,
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    /// Scripted offline client, useful for demos and tests.
    Mock,
}

impl ProviderKind {
    /// Providers offered in the UI, in display order.
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Groq,
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Mock,
    ];

    /// Human-readable provider name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Groq => "Groq",
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Mock => "Mock",
        }
    }

    /// Models offered for this provider. The first one is the default.
    pub fn models(self) -> &'static [&'static str] {
        match self {
            Self::Groq => &["llama3-70b-8192", "mixtral-8x7b-32768", "gemma-7b-it"],
            Self::OpenAi => &["gpt-4-turbo", "gpt-4-1106-preview", "gpt-3.5-turbo-0125"],
            Self::Anthropic => &[
                "claude-3-opus-20240229",
                "claude-3-sonnet-20240229",
                "claude-3-haiku-20240307",
            ],
            Self::Mock => &["mock-scripted"],
        }
    }

    pub fn default_model(self) -> &'static str {
        self.models()[0]
    }

    /// Environment variable consulted when no API key is given explicitly.
    pub fn api_key_env(self) -> Option<&'static str> {
        match self {
            Self::Groq => Some("GROQ_API_KEY"),
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Mock => None,
        }
    }

    /// Prefix the provider's keys start with; shown as a hint in the key field.
    pub fn api_key_hint(self) -> &'static str {
        match self {
            Self::Groq => "gsk-",
            Self::OpenAi => "sk-",
            Self::Anthropic => "sk-ant-",
            Self::Mock => "",
        }
    }

    /// Whether a search may run without an API key.
    pub fn requires_api_key(self) -> bool {
        !matches!(self, Self::Mock)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" | "open-ai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            other => Err(format!(
                "unknown provider '{other}' (expected groq, openai, anthropic or mock)"
            )),
        }
    }
}

/// Lowest temperature the UI offers.
pub const MIN_TEMPERATURE: f32 = 0.0;
/// Highest temperature the UI offers.
pub const MAX_TEMPERATURE: f32 = 1.0;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Provider, model, credential and temperature chosen for one search.
///
/// The API key is never serialized.
#[derive(Serialize, Deserialize, Clone, PartialEq, TS)]
pub struct ModelSelection {
    pub provider: ProviderKind,
    pub model: String,
    pub temperature: f32,
    #[serde(default, skip_serializing)]
    #[ts(skip)]
    pub api_key: String,
}

impl ModelSelection {
    /// Selection using the provider's default model and temperature.
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_key: String::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the temperature, clamped to the supported range.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Whether a search can start with this selection.
    pub fn has_credentials(&self) -> bool {
        !self.provider.requires_api_key() || !self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSelection")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .finish()
    }
}
