//! Global configuration models for `.price-scout/config.toml`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::markup_models::MarkupColor;
use crate::provider_models::{ProviderKind, DEFAULT_TEMPERATURE};

/// Name of the crew that runs when config.toml does not pick one.
pub const DEFAULT_CREW: &str = "price-comparison";

/// Settings from `.price-scout/config.toml`.
///
/// # Example
///
/// ```toml
/// provider = "anthropic"
/// model = "claude-3-haiku-20240307"
/// temperature = 0.3
/// api-key-env = "MY_ANTHROPIC_KEY"
/// crew = "price-comparison"
///
/// [annotator]
/// palette = ["violet", "blue", "orange"]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Provider preselected in the UI and used by `price-scout search`.
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Model name; falls back to the provider's default model.
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Environment variable holding the API key, overriding the provider default.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Crew to run for each search.
    #[serde(default = "default_crew")]
    pub crew: String,

    #[serde(default)]
    pub annotator: AnnotatorConfig,
}

/// Settings for the agent log highlighting.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct AnnotatorConfig {
    /// Colors cycled through for each new agent execution block.
    #[serde(default = "MarkupColor::default_palette")]
    pub palette: Vec<MarkupColor>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            palette: MarkupColor::default_palette(),
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            temperature: default_temperature(),
            api_key_env: None,
            crew: default_crew(),
            annotator: AnnotatorConfig::default(),
        }
    }
}

fn default_provider() -> ProviderKind {
    ProviderKind::Groq
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_crew() -> String {
    DEFAULT_CREW.to_string()
}
