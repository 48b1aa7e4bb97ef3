//! Shared helpers for the ps-core integration tests.

pub mod assertions;
pub mod fixtures;
pub mod scripted_client;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use scripted_client::*;
