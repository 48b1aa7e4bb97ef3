//! `price-scout tui`: the interactive front end.

use super::SelectionArgs;
use crate::logging;
use clap::Args;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use ps_core::config::load_config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args, Debug, Default)]
pub struct TuiArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

pub async fn run(args: TuiArgs, verbose: u8) -> Result<ExitCode> {
    let root = args.selection.root();
    let _guard = logging::init_file(&log_dir(root), verbose)?;

    let mut config = load_config(root).await?;
    let selection = args.selection.selection(&mut config);

    ps_tui::run_app(config, selection)
        .await
        .map_err(|e| eyre!(e))?;
    Ok(ExitCode::SUCCESS)
}

/// `.price-scout/logs` when the project is initialised, else the temp dir.
fn log_dir(root: &std::path::Path) -> PathBuf {
    let ps_dir = root.join(".price-scout");
    if ps_dir.is_dir() {
        ps_dir.join("logs")
    } else {
        std::env::temp_dir().join("price-scout")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_prefers_project() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(log_dir(temp.path()), std::env::temp_dir().join("price-scout"));

        std::fs::create_dir(temp.path().join(".price-scout")).unwrap();
        assert_eq!(log_dir(temp.path()), temp.path().join(".price-scout").join("logs"));
    }
}
