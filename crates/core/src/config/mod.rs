//! Configuration loading and management.
//!
//! This module loads everything under `<root>/.price-scout/`:
//! - `config.toml`: provider, model, temperature, crew and annotator palette
//! - `agents/*.md`: role overrides and additions
//! - `crews/*.yaml`: custom crews
//!
//! A missing directory or file falls back to the built-in defaults.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_config;
pub use models::AppConfig;
