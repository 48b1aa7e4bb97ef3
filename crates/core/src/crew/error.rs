//! Error types for crew assembly.

use thiserror::Error;

/// Errors found while turning a crew declaration into a runnable [`ps_protocol::Crew`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrewError {
    #[error("Crew '{0}' not found")]
    UnknownCrew(String),

    #[error("Crew '{0}' has no tasks")]
    NoTasks(String),

    #[error("Duplicate task id '{0}'")]
    DuplicateTaskId(String),

    /// A crew or task names a role that was never declared.
    #[error("Unknown agent '{agent}' referenced by {referenced_by}")]
    UnknownAgent { agent: String, referenced_by: String },

    /// A task lists a context task that does not run before it.
    #[error("Task '{task}' uses '{context}' as context, but it is not an earlier task")]
    InvalidContext { task: String, context: String },
}
