//! # ps-protocol
//!
//! Shared data models for price-scout.
//!
//! This crate defines the structures used for:
//! - Configuration file parsing (TOML config, Markdown roles, YAML crews)
//! - Model provider selection
//! - Runtime search run state
//! - Communication between a front end and the core
//!
//! ## Modules
//!
//! - [`config_models`]: Global configuration from config.toml
//! - [`crew_models`]: Role, task and crew declarations
//! - [`markup_models`]: Colors usable in agent log markup
//! - [`provider_models`]: Providers, model catalogs and model selection
//! - [`run_models`]: Search run state and status
//! - [`ipc`]: Operations and Events between front end and core
//!
//! No dependency on other price-scout crates; every type derives `TS`.

pub mod config_models;
pub mod crew_models;
pub mod ipc;
pub mod markup_models;
pub mod provider_models;
pub mod run_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use crew_models::*;
pub use ipc::*;
pub use markup_models::*;
pub use provider_models::*;
pub use run_models::*;
