//! Runtime state of a search run.
//!
//! Each time the user starts a search, a new [`Run`] is created with a
//! unique id to track the crew's progress and output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle status of a search run.
///
/// Normal progression: Pending -> Running -> Completed. A run that hits a
/// model or configuration error ends in Failed; a cancelled run ends in
/// Cancelled.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Run has been created but the crew has not started yet.
    Pending,

    /// The crew is executing tasks.
    Running,

    /// Every task finished and a result is available.
    Completed,

    /// The crew stopped because of an error.
    Failed,

    /// The user cancelled the run.
    Cancelled,
}

impl RunStatus {
    /// Whether the run can no longer change.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// State of one search run.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct Run {
    #[ts(type = "string")]
    pub id: Uuid,

    /// Product name or SKU the user searched for.
    pub query: String,

    pub status: RunStatus,

    /// Zero-based index of the task currently executing.
    pub current_task: usize,

    /// Annotated log blocks, in the order they were flushed.
    ///
    /// Append-only; the log panel is rendered from the whole list.
    pub log_blocks: Vec<String>,

    /// Task notices ("⚙ Task: ...") in arrival order.
    pub notices: Vec<String>,

    /// Final crew output, empty until the run completes.
    pub result: String,

    /// Error message when the run failed.
    pub error: Option<String>,

    #[ts(type = "string")]
    pub started_at: DateTime<Utc>,

    #[ts(type = "string | null")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Run {
    /// The full annotated transcript, rebuilt from every flushed block.
    pub fn transcript(&self) -> String {
        self.log_blocks.concat()
    }
}
