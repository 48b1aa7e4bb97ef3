//! Configuration file loader for the `.price-scout/` directory.

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::AppConfig;
use crate::crew::merge_roles;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use ps_protocol::{CrewDefinition, GlobalConfig, Role, MAX_TEMPERATURE, MIN_TEMPERATURE};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the configuration directory under the project root.
pub const CONFIG_DIR: &str = ".price-scout";

/// Loads all configuration from `<root>/.price-scout/`.
///
/// Role files override built-in roles of the same name; crew files with the
/// same name as a built-in crew replace it. Missing directories and files
/// leave the defaults in place.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML, YAML, or Markdown front matter)
/// - `temperature` is out of range or `palette` is empty
///
/// # Example
///
/// ```rust,no_run
/// use ps_core::config::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} roles and {} crews", config.roles.len(), config.crews.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let ps_dir = root.join(CONFIG_DIR);
    let mut config = AppConfig::default();

    if !ps_dir.exists() {
        tracing::debug!(dir = %ps_dir.display(), "no config directory, using defaults");
        return Ok(config);
    }

    config.global = load_global_config(&ps_dir)?;

    let roles = load_roles(&ps_dir)?;
    config.roles = merge_roles(config.roles, &roles);

    for crew in load_crews(&ps_dir)? {
        match config.crews.iter_mut().find(|c| c.name == crew.name) {
            Some(existing) => *existing = crew,
            None => config.crews.push(crew),
        }
    }

    tracing::info!(
        dir = %ps_dir.display(),
        provider = %config.global.provider,
        roles = config.roles.len(),
        crews = config.crews.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Loads and checks `config.toml`.
fn load_global_config(ps_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = ps_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content = read_file(&config_path)?;
    let config: GlobalConfig = toml::from_str(&content).map_err(|source| ConfigError::Settings {
        path: config_path.clone(),
        source,
    })?;

    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&config.temperature) {
        return Err(ConfigError::Invalid {
            path: config_path,
            reason: format!(
                "temperature {} is outside {MIN_TEMPERATURE}..={MAX_TEMPERATURE}",
                config.temperature
            ),
        });
    }
    if config.annotator.palette.is_empty() {
        return Err(ConfigError::Invalid {
            path: config_path,
            reason: "annotator palette must name at least one color".to_string(),
        });
    }

    Ok(config)
}

/// Loads all role definitions from `agents/*.md`.
fn load_roles(ps_dir: &Path) -> ConfigResult<Vec<Role>> {
    let mut roles = Vec::new();

    for path in files_with_extensions(&ps_dir.join("agents"), &["md"])? {
        let content = read_file(&path)?;

        let matter = Matter::<YAML>::new();
        let parsed = matter.parse(&content);

        let mut role: Role = parsed
            .data
            .ok_or_else(|| ConfigError::RoleFile {
                path: path.clone(),
                reason: "Missing YAML front matter".to_string(),
            })?
            .deserialize()
            .map_err(|e| ConfigError::RoleFile {
                path: path.clone(),
                reason: format!("Failed to deserialize front matter: {e}"),
            })?;

        let body = parsed.content.trim();
        if !body.is_empty() {
            role.backstory = body.to_string();
        }

        tracing::debug!(role = %role.name, path = %path.display(), "role loaded");
        roles.push(role);
    }

    Ok(roles)
}

/// Loads all crew definitions from `crews/*.yaml` and `crews/*.yml`.
fn load_crews(ps_dir: &Path) -> ConfigResult<Vec<CrewDefinition>> {
    let mut crews = Vec::new();

    for path in files_with_extensions(&ps_dir.join("crews"), &["yaml", "yml"])? {
        let content = read_file(&path)?;
        let crew: CrewDefinition =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::CrewFile {
                path: path.clone(),
                source,
            })?;
        crews.push(crew);
    }

    Ok(crews)
}

/// Files directly inside `dir` with one of `extensions`, sorted by name.
/// A missing directory yields no files.
fn files_with_extensions(dir: &Path, extensions: &[&str]) -> ConfigResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        let ext = path.extension().and_then(|s| s.to_str());
        if entry.file_type().is_file() && ext.is_some_and(|ext| extensions.contains(&ext)) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_protocol::{MarkupColor, ProviderKind};
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_config_acceptance() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let ps_dir = root.join(CONFIG_DIR);

        fs::create_dir_all(ps_dir.join("agents")).expect("Failed to create agents dir");
        fs::create_dir_all(ps_dir.join("crews")).expect("Failed to create crews dir");

        let config_toml = r#"
provider = "anthropic"
model = "claude-3-haiku-20240307"
temperature = 0.3
api-key-env = "MY_ANTHROPIC_KEY"
crew = "quick-check"

[annotator]
palette = ["violet", "blue"]
"#;
        fs::write(ps_dir.join("config.toml"), config_toml).expect("Failed to write config.toml");

        let role_md = r#"---
name: Price Analyzer
goal: Find the single cheapest trustworthy offer.
color: violet
---

Veteran bargain hunter who distrusts marketplace listings."#;
        fs::write(ps_dir.join("agents/price-analyzer.md"), role_md)
            .expect("Failed to write role file");

        let crew_yaml = r#"name: quick-check
agents:
  - "Search Query Optimizer"
  - "Price Analyzer"
tasks:
  - id: optimize
    description: "Optimize the search query: '{query}'."
    expected-output: "An optimized search query string."
    agent: "Search Query Optimizer"
  - id: analyze
    description: "Estimate a fair price."
    expected-output: "A short price estimate."
    agent: "Price Analyzer"
    context: [optimize]
"#;
        fs::write(ps_dir.join("crews/quick-check.yaml"), crew_yaml)
            .expect("Failed to write crew file");

        let config = load_config(root).await.expect("Failed to load config");

        assert_eq!(config.global.provider, ProviderKind::Anthropic);
        assert_eq!(config.global.model.as_deref(), Some("claude-3-haiku-20240307"));
        assert_eq!(config.global.api_key_env.as_deref(), Some("MY_ANTHROPIC_KEY"));
        assert_eq!(
            config.global.annotator.palette,
            vec![MarkupColor::Violet, MarkupColor::Blue]
        );

        assert_eq!(config.roles.len(), 3, "override replaces the built-in role");
        let analyzer = config.roles.iter().find(|r| r.name == "Price Analyzer").unwrap();
        assert_eq!(analyzer.color, Some(MarkupColor::Violet));
        assert!(analyzer.backstory.starts_with("Veteran bargain hunter"));

        assert_eq!(config.crews.len(), 2);
        let crew = config.crew_for("kettle").unwrap();
        assert_eq!(crew.name, "quick-check");
        assert_eq!(crew.tasks[0].description, "Optimize the search query: 'kettle'.");
    }

    #[tokio::test]
    async fn test_load_config_empty_directory() {
        let dir = tempdir().expect("Failed to create temp dir");

        let config = load_config(dir.path())
            .await
            .expect("Should handle missing .price-scout");

        assert_eq!(config.global, GlobalConfig::default());
        assert_eq!(config.roles.len(), 3);
        assert_eq!(config.crews.len(), 1);
    }

    #[tokio::test]
    async fn test_load_config_partial() {
        let dir = tempdir().expect("Failed to create temp dir");
        let ps_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&ps_dir).expect("Failed to create .price-scout");
        fs::write(ps_dir.join("config.toml"), "provider = \"mock\"")
            .expect("Failed to write config.toml");

        let config = load_config(dir.path()).await.expect("Should handle partial config");

        assert_eq!(config.global.provider, ProviderKind::Mock);
        assert_eq!(config.global.crew, "price-comparison");
        assert_eq!(config.crews.len(), 1);
    }

    #[tokio::test]
    async fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let ps_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&ps_dir).expect("Failed to create .price-scout");
        fs::write(ps_dir.join("config.toml"), "provider = [invalid toml")
            .expect("Failed to write config.toml");

        match load_config(dir.path()).await {
            Err(ConfigError::Settings { path, .. }) => assert!(path.ends_with("config.toml")),
            other => panic!("Expected TomlParse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_config_rejects_empty_palette() {
        let dir = tempdir().expect("Failed to create temp dir");
        let ps_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&ps_dir).expect("Failed to create .price-scout");
        fs::write(ps_dir.join("config.toml"), "[annotator]\npalette = []\n")
            .expect("Failed to write config.toml");

        let result = load_config(dir.path()).await;
        assert!(matches!(result, Err(ConfigError::Invalid { reason, .. }) if reason.contains("palette")));
    }

    #[tokio::test]
    async fn test_load_config_rejects_temperature_out_of_range() {
        let dir = tempdir().expect("Failed to create temp dir");
        let ps_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&ps_dir).expect("Failed to create .price-scout");
        fs::write(ps_dir.join("config.toml"), "temperature = 1.5\n")
            .expect("Failed to write config.toml");

        let result = load_config(dir.path()).await;
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[tokio::test]
    async fn test_load_config_invalid_yaml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let ps_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(ps_dir.join("crews")).expect("Failed to create crews dir");
        fs::write(ps_dir.join("crews/broken.yaml"), "name: test\n  invalid: [yaml")
            .expect("Failed to write crew file");

        match load_config(dir.path()).await {
            Err(ConfigError::CrewFile { path, .. }) => assert!(path.ends_with("broken.yaml")),
            other => panic!("Expected YamlParse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_config_role_without_front_matter() {
        let dir = tempdir().expect("Failed to create temp dir");
        let ps_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(ps_dir.join("agents")).expect("Failed to create agents dir");
        fs::write(ps_dir.join("agents/plain.md"), "Just plain markdown content")
            .expect("Failed to write role file");

        match load_config(dir.path()).await {
            Err(ConfigError::RoleFile { path, reason }) => {
                assert!(path.ends_with("plain.md"));
                assert!(reason.contains("Missing YAML front matter"));
            }
            other => panic!("Expected MarkdownParse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_config_role_missing_goal() {
        let dir = tempdir().expect("Failed to create temp dir");
        let ps_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(ps_dir.join("agents")).expect("Failed to create agents dir");
        fs::write(
            ps_dir.join("agents/partial.md"),
            "---\nname: Shipping Expert\n---\n\nKnows couriers.",
        )
        .expect("Failed to write role file");

        match load_config(dir.path()).await {
            Err(ConfigError::RoleFile { reason, .. }) => {
                assert!(reason.contains("Failed to deserialize"))
            }
            other => panic!("Expected MarkdownParse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_config_adds_new_role_and_ignores_other_files() {
        let dir = tempdir().expect("Failed to create temp dir");
        let ps_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(ps_dir.join("agents")).expect("Failed to create agents dir");
        fs::create_dir_all(ps_dir.join("crews")).expect("Failed to create crews dir");

        fs::write(ps_dir.join("agents/readme.txt"), "Not a role").unwrap();
        fs::write(ps_dir.join("crews/notes.txt"), "Not a crew").unwrap();
        fs::write(
            ps_dir.join("agents/shipping.md"),
            "---\nname: Shipping Expert\ngoal: Estimate delivery times.\n---\n\nKnows couriers.",
        )
        .unwrap();

        let config = load_config(dir.path()).await.expect("Should ignore other files");

        assert_eq!(config.roles.len(), 4);
        assert_eq!(config.roles[3].backstory, "Knows couriers.");
        assert_eq!(config.crews.len(), 1);
    }

    #[tokio::test]
    async fn test_load_config_yml_extension_replaces_builtin() {
        let dir = tempdir().expect("Failed to create temp dir");
        let ps_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(ps_dir.join("crews")).expect("Failed to create crews dir");

        let crew_yaml = r#"name: price-comparison
agents: ["Price Analyzer"]
tasks:
  - id: analyze
    description: "Analyze prices for {query}."
    expected-output: "A recommendation."
    agent: "Price Analyzer"
"#;
        fs::write(ps_dir.join("crews/override.yml"), crew_yaml).unwrap();

        let config = load_config(dir.path()).await.expect("Should load .yml files");

        assert_eq!(config.crews.len(), 1);
        assert_eq!(config.crew_for("kettle").unwrap().tasks.len(), 1);
    }
}
