//! `price-scout search`: one search, streamed to the terminal.

use super::SelectionArgs;
use crate::render::render_block;
use clap::Args;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use colored::Colorize;
use ps_core::config::load_config;
use ps_core::state::RunManager;
use ps_protocol::Event;
use std::io::Write;
use std::process::ExitCode;
use tokio::sync::mpsc::unbounded_channel;

/// Exit code after Ctrl-C, as shells report SIGINT.
const EXIT_CANCELLED: u8 = 130;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Product name or SKU
    #[arg(required = true)]
    pub product: Vec<String>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Print plain text without colors
    #[arg(long)]
    pub no_color: bool,
}

pub async fn run(args: SearchArgs) -> Result<ExitCode> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let query = args.product.join(" ");
    let mut config = load_config(args.selection.root()).await?;
    let selection = args.selection.selection(&mut config);
    tracing::debug!(provider = %selection.provider, model = %selection.model, "search selection");

    let (events_tx, mut events_rx) = unbounded_channel();
    let manager = RunManager::new(config, events_tx);
    let run_id = manager
        .start_search(&query, selection)
        .await
        .map_err(|e| eyre!(e))?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            event = events_rx.recv() => {
                let Some(event) = event else {
                    bail!("search stopped without a final status");
                };
                if let Some(code) = print_event(&mut stdout, event)? {
                    return Ok(code);
                }
            }
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                eprintln!("{}", "Cancelling search...".yellow());
                manager.cancel_search(run_id).await.map_err(|e| eyre!(e))?;
            }
        }
    }
}

/// Print one event. Returns the exit code once the run has ended.
fn print_event(out: &mut impl Write, event: Event) -> Result<Option<ExitCode>> {
    match event {
        Event::RunStarted { query, .. } => {
            eprintln!("{} {}", "Searching for the best prices:".bold(), query);
        }
        Event::RunStatusUpdate {
            status, task_index, ..
        } => {
            tracing::debug!(?status, task_index, "status update");
        }
        Event::TaskNotice { message, .. } => {
            eprintln!("{}", message.cyan());
        }
        Event::LogBlock {
            text,
            allow_raw_markup,
            ..
        } => {
            write!(out, "{}", render_block(&text, allow_raw_markup))?;
            out.flush()?;
        }
        Event::RunCompleted { result, .. } => {
            writeln!(out)?;
            writeln!(out, "{}", "Search complete!".green().bold())?;
            writeln!(out, "{result}")?;
            return Ok(Some(ExitCode::SUCCESS));
        }
        Event::RunError { error, .. } => {
            eprintln!("{} {}", "Error:".red().bold(), error.red());
            return Ok(Some(ExitCode::FAILURE));
        }
        Event::RunCancelled { .. } => {
            eprintln!("{}", "Search cancelled.".yellow());
            return Ok(Some(ExitCode::from(EXIT_CANCELLED)));
        }
    }
    Ok(None)
}
