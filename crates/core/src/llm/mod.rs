//! Language-model clients.
//!
//! This module provides the `ModelClient` trait (Adapter Pattern), one
//! adapter per provider family, and the `ClientFactory` that picks the
//! adapter for a [`ps_protocol::ModelSelection`].

pub mod adapters;
pub mod base;
pub mod factory;
pub mod provider;

pub use adapters::{AnthropicAdapter, MockClient, OpenAiCompatAdapter};
pub use base::{CompletionRequest, ModelClient, ModelError, ModelEvent, ModelEventStream};
pub use factory::ClientFactory;
pub use provider::ProviderEndpoint;
