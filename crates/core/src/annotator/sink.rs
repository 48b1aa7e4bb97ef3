//! Sink traits the annotator reads from and writes to.

use ps_protocol::ipc::Event;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Receives raw progress text, one chunk at a time, in arrival order.
///
/// Chunk boundaries are arbitrary and need not line up with lines.
pub trait ChunkSink {
    fn write(&mut self, chunk: &str);

    /// Called once the producer has written its last chunk.
    fn finish(&mut self) {}
}

/// Displays the annotated log.
///
/// Each call carries a complete block that replaces whatever the sink last
/// rendered for that block; calling it repeatedly must be safe.
pub trait DisplaySink {
    fn render(&mut self, full_text: &str, allow_raw_markup: bool);
}

/// Shows short informational notices, such as detected task labels.
pub trait NoticeSink {
    fn notice(&mut self, message: &str);
}

impl ChunkSink for String {
    fn write(&mut self, chunk: &str) {
        self.push_str(chunk);
    }
}

impl ChunkSink for Vec<String> {
    fn write(&mut self, chunk: &str) {
        self.push(chunk.to_string());
    }
}

/// Forwards renders and notices to a front end as [`Event`]s.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    run_id: Uuid,
    events_tx: UnboundedSender<Event>,
}

impl ChannelSink {
    pub fn new(run_id: Uuid, events_tx: UnboundedSender<Event>) -> Self {
        Self { run_id, events_tx }
    }
}

impl DisplaySink for ChannelSink {
    fn render(&mut self, full_text: &str, allow_raw_markup: bool) {
        let _ = self.events_tx.send(Event::LogBlock {
            run_id: self.run_id,
            text: full_text.to_string(),
            allow_raw_markup,
        });
    }
}

impl NoticeSink for ChannelSink {
    fn notice(&mut self, message: &str) {
        let _ = self.events_tx.send(Event::TaskNotice {
            run_id: self.run_id,
            message: message.to_string(),
        });
    }
}

/// Keeps everything it receives. Handy for tests and for capturing output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    pub renders: Vec<(String, bool)>,
    pub notices: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text of the most recent render, if any.
    pub fn last_render(&self) -> Option<&str> {
        self.renders.last().map(|(text, _)| text.as_str())
    }
}

impl DisplaySink for RecordingSink {
    fn render(&mut self, full_text: &str, allow_raw_markup: bool) {
        self.renders.push((full_text.to_string(), allow_raw_markup));
    }
}

impl NoticeSink for RecordingSink {
    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
