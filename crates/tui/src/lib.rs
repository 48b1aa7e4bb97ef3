//! # ps-tui
//!
//! Terminal user interface for price-scout.
//!
//! The TUI talks to a [`RunManager`] from `ps-core` over channels of
//! `Op` and `Event` from `ps-protocol`; it never calls the crew engine
//! directly.

pub mod app;
pub mod event;
pub mod event_handler;
pub mod form;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use form::SearchForm;
pub use tui::Tui;

use anyhow::Result;
use ps_core::config::AppConfig;
use ps_core::state::RunManager;
use ps_protocol::{ModelSelection, Op};
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;

/// Start a run manager, take over the terminal and run the TUI until the
/// user quits. Running searches are cancelled on exit.
pub async fn run_app(config: AppConfig, selection: ModelSelection) -> Result<()> {
    let (op_tx, op_rx) = unbounded_channel();
    let (events_tx, events_rx) = unbounded_channel();

    let manager = Arc::new(RunManager::new(config, events_tx));
    let server = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.serve(op_rx).await })
    };

    let mut tui = Tui::init()?;
    let mut app = App::new(SearchForm::new(selection), op_tx.clone(), events_rx);
    let result = app.run(&mut tui).await;
    tui.restore()?;

    let _ = op_tx.send(Op::Shutdown);
    if let Err(e) = server.await {
        tracing::warn!(error = %e, "run manager task ended abnormally");
    }
    tracing::info!(runs = manager.list_runs().await.len(), "tui closed");

    result
}
