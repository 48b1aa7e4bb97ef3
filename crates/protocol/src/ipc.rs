//! Inter-process communication protocol.
//!
//! This module defines the message types exchanged between a front end
//! (TUI or headless CLI) and the core:
//! - `Op`: commands sent from the front end to the core
//! - `Event`: status updates sent from the core to the front end
//!
//! Communication is asynchronous and channel-based, so the UI stays
//! responsive while a crew is running.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::provider_models::ModelSelection;
use crate::run_models::RunStatus;

/// Operations sent from the front end to the core.
///
/// Uses tagged enum serialization:
/// ```json
/// {
///   "type": "startSearch",
///   "payload": {
///     "query": "sony wh-1000xm5",
///     "selection": { "provider": "groq", "model": "llama3-70b-8192", "temperature": 0.7 }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Run the configured crew for a product.
    StartSearch {
        /// Product name or SKU.
        query: String,
        selection: ModelSelection,
    },

    /// Stop a running search. Output produced so far is kept.
    CancelSearch {
        #[ts(type = "string")]
        run_id: Uuid,
    },

    /// Shut down the core; running searches are aborted.
    Shutdown,
}

/// Events sent from the core to the front end.
///
/// Uses tagged enum serialization:
/// ```json
/// {
///   "type": "taskNotice",
///   "payload": { "run_id": "uuid-here", "message": "⚙ Task: Optimize the search query" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A search run has been created.
    RunStarted {
        #[ts(type = "string")]
        run_id: Uuid,
        query: String,
    },

    /// A run's status or current task changed.
    RunStatusUpdate {
        #[ts(type = "string")]
        run_id: Uuid,
        status: RunStatus,
        task_index: usize,
    },

    /// A task label was detected in the agent log.
    TaskNotice {
        #[ts(type = "string")]
        run_id: Uuid,
        message: String,
    },

    /// A block of annotated agent log was flushed.
    ///
    /// The front end appends it to the run's transcript and re-renders the
    /// log panel from the whole transcript.
    LogBlock {
        #[ts(type = "string")]
        run_id: Uuid,
        text: String,
        /// Whether the text may be interpreted as markup.
        allow_raw_markup: bool,
    },

    /// The crew finished and produced its final answer.
    RunCompleted {
        #[ts(type = "string")]
        run_id: Uuid,
        result: String,
    },

    /// The run stopped because of an error.
    RunError {
        #[ts(type = "string")]
        run_id: Uuid,
        error: String,
    },

    /// The run was cancelled by the user.
    RunCancelled {
        #[ts(type = "string")]
        run_id: Uuid,
    },
}

impl Event {
    /// Id of the run this event belongs to.
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::RunStatusUpdate { run_id, .. }
            | Self::TaskNotice { run_id, .. }
            | Self::LogBlock { run_id, .. }
            | Self::RunCompleted { run_id, .. }
            | Self::RunError { run_id, .. }
            | Self::RunCancelled { run_id } => *run_id,
        }
    }

    /// Whether this event ends its run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::RunCompleted { .. } | Self::RunError { .. } | Self::RunCancelled { .. }
        )
    }
}
