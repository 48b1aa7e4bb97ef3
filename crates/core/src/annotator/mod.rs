//! Streaming annotation of agent log output.
//!
//! The crew engine writes its progress text chunk by chunk into a
//! [`ChunkSink`]. A [`StreamAnnotator`] is the sink used for search runs: it
//! strips terminal color codes, reports task labels as notices, highlights
//! execution blocks, role names, prices and "best deal" mentions with
//! [`crate::markup`] directives, and hands every completed line to a
//! [`DisplaySink`].

pub mod sink;
pub mod stream;

pub use sink::{ChannelSink, ChunkSink, DisplaySink, NoticeSink, RecordingSink};
pub use stream::{StreamAnnotator, DEFAULT_AGENT_COLORS, EXECUTION_START_MARKER, FINISHED_CHAIN_MARKER};
