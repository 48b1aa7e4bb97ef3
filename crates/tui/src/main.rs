//! Standalone TUI for price-scout, using `.price-scout/` in the current directory.

use anyhow::Result;
use ps_core::config::load_config;
use ps_tui::run_app;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(Path::new(".")).await?;
    let selection = config.selection(None);
    run_app(config, selection).await
}
