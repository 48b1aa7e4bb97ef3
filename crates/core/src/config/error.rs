//! Errors raised while loading `.price-scout/`.

use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Every variant carries the offending file so the UI can point at it.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `config.toml` is not valid settings TOML.
    #[error("Invalid settings in {path:?}: {source}")]
    Settings {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A `crews/*.yaml` file is not a crew definition.
    #[error("Invalid crew file {path:?}: {source}")]
    CrewFile {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// An `agents/*.md` file has no front matter, or it does not describe a role.
    #[error("Invalid role file {path:?}: {reason}")]
    RoleFile { path: PathBuf, reason: String },

    #[error("Cannot list {path:?}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Parses, but cannot be used, such as an empty palette.
    #[error("Unusable configuration in {path:?}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}
