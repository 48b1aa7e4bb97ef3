//! `price-scout`: compare product prices with a crew of language-model agents.
//!
//! ```bash
//! # Interactive terminal UI (the default)
//! price-scout
//!
//! # One search, annotated log on stdout
//! price-scout search "Sony WH-1000XM5" --provider mock
//!
//! # Scaffold .price-scout/ in the current directory
//! price-scout init
//! ```

mod commands;
mod logging;
mod render;

use clap::{Parser, Subcommand};
use commands::{InitArgs, ModelsArgs, SearchArgs, TuiArgs};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "price-scout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one search and print the annotated agent log
    Search(SearchArgs),
    /// List providers and their models
    Models(ModelsArgs),
    /// Create a .price-scout/ directory with editable defaults
    Init(InitArgs),
    /// Open the terminal UI
    Tui(TuiArgs),
}

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search(args)) => {
            logging::init_stderr(cli.verbose);
            commands::search::run(args).await
        }
        Some(Commands::Models(args)) => commands::models::run(&args),
        Some(Commands::Init(args)) => {
            logging::init_stderr(cli.verbose);
            commands::init::run(args).await
        }
        Some(Commands::Tui(args)) => commands::tui::run(args, cli.verbose).await,
        None => commands::tui::run(TuiArgs::default(), cli.verbose).await,
    }
}
