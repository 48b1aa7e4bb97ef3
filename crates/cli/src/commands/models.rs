//! `price-scout models`: providers, their models and key variables.

use clap::Args;
use color_eyre::Result;
use colored::Colorize;
use ps_protocol::ProviderKind;
use serde_json::{json, Value};
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Only list this provider
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ModelsArgs) -> Result<ExitCode> {
    let providers: Vec<ProviderKind> = match args.provider {
        Some(provider) => vec![provider],
        None => ProviderKind::ALL.to_vec(),
    };

    if args.json {
        let listing: Vec<Value> = providers.iter().map(|p| provider_json(*p)).collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for provider in providers {
            print!("{}", provider_text(provider));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn provider_json(provider: ProviderKind) -> Value {
    json!({
        "provider": provider,
        "name": provider.display_name(),
        "models": provider.models(),
        "default_model": provider.default_model(),
        "api_key_env": provider.api_key_env(),
    })
}

fn provider_text(provider: ProviderKind) -> String {
    let key = match provider.api_key_env() {
        Some(var) => format!("key from ${var}"),
        None => "no key needed".to_string(),
    };
    let mut text = format!("{} ({})\n", provider.display_name().bold(), key.dimmed());
    for model in provider.models() {
        if *model == provider.default_model() {
            text.push_str(&format!("  {model} {}\n", "(default)".green()));
        } else {
            text.push_str(&format!("  {model}\n"));
        }
    }
    text
}
