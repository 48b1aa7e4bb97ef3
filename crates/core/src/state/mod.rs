//! State management for search runs.
//!
//! This module provides:
//! - Run state machine functions and event folding ([`run`])
//! - [`RunManager`] for starting, tracking and cancelling searches

pub mod manager;
pub mod run;

pub use manager::RunManager;
