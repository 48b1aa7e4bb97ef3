//! Writes the `.price-scout/` directory from the embedded templates.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory that will contain `.price-scout/`.
    pub target_dir: PathBuf,

    /// Overwrite files in an existing `.price-scout/`.
    pub force: bool,

    /// Only write `config.toml`.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.price-scout` directory.
///
/// ```text
/// .price-scout/
/// ├── config.toml
/// ├── agents/            (unless minimal)
/// │   ├── data-retrieval-specialist.md
/// │   ├── price-analyzer.md
/// │   └── search-query-optimizer.md
/// └── crews/             (unless minimal)
///     └── quick-check.yaml
/// ```
///
/// Returns the paths written, relative to `.price-scout/`.
pub async fn generate_price_scout_structure(options: InitOptions) -> InitResult<Vec<String>> {
    let ps_dir = options.target_dir.join(".price-scout");

    if ps_dir.exists() && !options.force {
        return Err(InitError::AlreadyInitialized(ps_dir));
    }

    let mut written = vec!["config.toml".to_string()];
    if !options.minimal {
        written.extend(list_templates("agents/"));
        written.extend(list_templates("crews/"));
    }

    for template_path in &written {
        write_template_file(&ps_dir, template_path)?;
    }

    tracing::info!(dir = %ps_dir.display(), files = written.len(), "initialized .price-scout");
    Ok(written)
}

fn write_template_file(ps_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::MissingTemplate(template_path.to_string()))?;

    let target_path = ps_dir.join(template_path);
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::Write {
        path: target_path,
        source,
    })
}
