//! # ps-core
//!
//! Core search machinery for price-scout.
//!
//! This crate provides:
//! - The stream annotator that highlights agent log output
//! - The inline markup grammar the annotator produces
//! - Model clients for Groq, OpenAI, Anthropic and an offline mock
//! - The crew engine that runs roles and tasks against a model client
//! - Configuration loading from the `.price-scout/` directory
//! - Run state management for concurrent searches
//!
//! ## Modules
//!
//! - [`annotator`]: Stream annotator and its sinks
//! - [`markup`]: `:color[text]` and `:star:` markup
//! - [`llm`]: `ModelClient` trait and provider adapters
//! - [`crew`]: Crew assembly and execution engine
//! - [`config`]: Configuration loading
//! - [`init`]: `.price-scout/` scaffolding
//! - [`state`]: Run state machine and manager

pub mod annotator;
pub mod config;
pub mod crew;
pub mod init;
pub mod llm;
pub mod markup;
pub mod state;
