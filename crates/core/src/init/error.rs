//! Errors raised while scaffolding `.price-scout/`.

use std::path::PathBuf;
use thiserror::Error;

pub type InitResult<T> = Result<T, InitError>;

#[derive(Debug, Error)]
pub enum InitError {
    /// `.price-scout/` is already there and `force` was not set.
    #[error("{0:?} already exists. Use --force to overwrite.")]
    AlreadyInitialized(PathBuf),

    /// The binary was built without the named template.
    #[error("Template file not found: {0}")]
    MissingTemplate(String),

    /// Creating a directory or writing a file failed.
    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
