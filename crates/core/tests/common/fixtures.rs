//! Temporary `.price-scout/` projects and event collection.

#![allow(dead_code)]

use ps_protocol::ipc::Event;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

pub const MOCK_CONFIG: &str = r#"
provider = "mock"
temperature = 0.2
crew = "price-comparison"

[annotator]
palette = ["violet", "blue"]
"#;

pub const QUICK_CHECK_CREW: &str = r#"
name: quick-check
agents:
  - "Search Query Optimizer"
  - "Price Analyzer"
tasks:
  - id: optimize
    description: "Optimize the search query: '{query}' for best results."
    expected-output: "An optimized search query string."
    agent: "Search Query Optimizer"
  - id: analyze
    description: "Analyze typical prices for the optimized query."
    expected-output: "A short price estimate."
    agent: "Price Analyzer"
    context: [optimize]
"#;

/// Create a project whose `.price-scout/config.toml` holds `config`.
pub fn create_project(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "config.toml", config);
    dir
}

/// Write `contents` to `.price-scout/<relative>` under `root`.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(".price-scout").join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// Project using the mock provider with the `quick-check` crew selected.
pub fn create_quick_check_project() -> TempDir {
    let dir = create_project(&MOCK_CONFIG.replace("price-comparison", "quick-check"));
    write_file(dir.path(), "crews/quick-check.yaml", QUICK_CHECK_CREW);
    dir
}

/// Receive events until `wait` passes without a new one.
pub async fn collect_events_until_timeout(
    rx: &mut UnboundedReceiver<Event>,
    wait: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(Some(event)) = timeout(wait, rx.recv()).await {
        events.push(event);
    }
    events
}

/// Receive events until one ends the run, or `wait` passes without one.
pub async fn collect_events_until_terminal(
    rx: &mut UnboundedReceiver<Event>,
    wait: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(Some(event)) = timeout(wait, rx.recv()).await {
        let done = event.is_terminal();
        events.push(event);
        if done {
            break;
        }
    }
    events
}
