//! `price-scout init`: scaffold `.price-scout/`.

use clap::Args;
use color_eyre::Result;
use colored::Colorize;
use ps_core::init::{generate_price_scout_structure, InitError, InitOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create .price-scout/ in
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing .price-scout/
    #[arg(short, long)]
    pub force: bool,

    /// Only write config.toml
    #[arg(long)]
    pub minimal: bool,
}

pub async fn run(args: InitArgs) -> Result<ExitCode> {
    let options = InitOptions {
        target_dir: args.dir.clone(),
        force: args.force,
        minimal: args.minimal,
    };

    match generate_price_scout_structure(options).await {
        Ok(written) => {
            let ps_dir = args.dir.join(".price-scout");
            println!("{} {}", "Created".green().bold(), ps_dir.display());
            for path in written {
                println!("  {path}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ InitError::AlreadyInitialized(_)) => {
            eprintln!("{} {err}", "Error:".red().bold());
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}
