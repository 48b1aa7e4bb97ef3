//! Model client adapter implementations.

mod anthropic_adapter;
pub mod mock_client;
mod openai_compat_adapter;
pub mod sse;

pub use anthropic_adapter::AnthropicAdapter;
pub use mock_client::MockClient;
pub use openai_compat_adapter::OpenAiCompatAdapter;
