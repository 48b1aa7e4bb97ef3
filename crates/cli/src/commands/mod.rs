//! Subcommands and the arguments they share.

pub mod init;
pub mod models;
pub mod search;
pub mod tui;

pub use init::InitArgs;
pub use models::ModelsArgs;
pub use search::SearchArgs;
pub use tui::TuiArgs;

use clap::Args;
use ps_core::config::AppConfig;
use ps_protocol::{ModelSelection, ProviderKind, MAX_TEMPERATURE, MIN_TEMPERATURE};
use std::path::{Path, PathBuf};

/// Model and config overrides accepted by `search` and `tui`.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Provider: groq, openai, anthropic or mock
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,

    /// Model name (defaults to the provider's first model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature between 0.0 and 1.0
    #[arg(short, long, value_parser = parse_temperature)]
    pub temperature: Option<f32>,

    /// API key (defaults to the provider's environment variable)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Directory containing .price-scout/
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl SelectionArgs {
    pub fn root(&self) -> &Path {
        self.root.as_deref().unwrap_or(Path::new("."))
    }

    /// Fold the command-line overrides into the loaded config.
    ///
    /// Switching provider drops the configured model and key variable,
    /// which belong to the configured provider.
    pub fn apply(&self, config: &mut AppConfig) {
        let global = &mut config.global;
        if let Some(provider) = self.provider.filter(|p| *p != global.provider) {
            global.provider = provider;
            global.model = None;
            global.api_key_env = None;
        }
        if let Some(model) = &self.model {
            global.model = Some(model.clone());
        }
        if let Some(temperature) = self.temperature {
            global.temperature = temperature;
        }
    }

    /// Apply the overrides and build the selection for a search.
    pub fn selection(&self, config: &mut AppConfig) -> ModelSelection {
        self.apply(config);
        config.selection(self.api_key.as_deref())
    }
}

fn parse_temperature(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "temperature must be between {MIN_TEMPERATURE} and {MAX_TEMPERATURE}"
        ))
    }
}
