//! Run state machine implementation.
//!
//! This module provides functions for managing the lifecycle of a [`Run`],
//! including state transitions and event emission, plus [`apply_event`] for
//! rebuilding run state from the event stream on the receiving side.

use chrono::Utc;
use ps_protocol::ipc::Event;
use ps_protocol::run_models::{Run, RunStatus};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Create a new Run with Pending status.
///
/// # Arguments
///
/// * `query` - The product name or SKU being searched for
pub fn create_run(query: impl Into<String>) -> Run {
    Run {
        id: Uuid::new_v4(),
        query: query.into(),
        status: RunStatus::Pending,
        current_task: 0,
        log_blocks: Vec::new(),
        notices: Vec::new(),
        result: String::new(),
        error: None,
        started_at: Utc::now(),
        completed_at: None,
    }
}

/// Transition the run to Running status and emit event.
pub fn start_run(run: &mut Run, events_tx: &UnboundedSender<Event>) {
    run.status = RunStatus::Running;
    emit_status(run, events_tx);
}

/// Move on to the next task and emit event.
pub fn advance_task(run: &mut Run, events_tx: &UnboundedSender<Event>) {
    run.current_task += 1;
    emit_status(run, events_tx);
}

/// Mark the run as completed with the crew's final output.
pub fn complete_run(run: &mut Run, events_tx: &UnboundedSender<Event>, result: String) {
    run.status = RunStatus::Completed;
    run.result = result.clone();
    run.completed_at = Some(Utc::now());
    emit_status(run, events_tx);
    let _ = events_tx.send(Event::RunCompleted {
        run_id: run.id,
        result,
    });
}

/// Mark the run as failed and emit error event.
///
/// # Arguments
///
/// * `run` - The run to fail
/// * `events_tx` - Channel to send error event
/// * `error` - Error message describing the failure
pub fn fail_run(run: &mut Run, events_tx: &UnboundedSender<Event>, error: String) {
    run.status = RunStatus::Failed;
    run.error = Some(error.clone());
    run.completed_at = Some(Utc::now());
    emit_status(run, events_tx);
    let _ = events_tx.send(Event::RunError {
        run_id: run.id,
        error,
    });
}

/// Mark the run as cancelled and emit event.
pub fn cancel_run(run: &mut Run, events_tx: &UnboundedSender<Event>) {
    run.status = RunStatus::Cancelled;
    run.completed_at = Some(Utc::now());
    emit_status(run, events_tx);
    let _ = events_tx.send(Event::RunCancelled { run_id: run.id });
}

fn emit_status(run: &Run, events_tx: &UnboundedSender<Event>) {
    let _ = events_tx.send(Event::RunStatusUpdate {
        run_id: run.id,
        status: run.status,
        task_index: run.current_task,
    });
}

/// Fold one event into a run.
///
/// Returns `false` when the event was ignored: it belongs to another run, or
/// the run already reached a terminal status. Terminal runs never change.
///
/// A terminal status only takes effect with its terminal event
/// (`RunCompleted`, `RunError`, `RunCancelled`), so the status update that
/// precedes those events does not close the run early.
pub fn apply_event(run: &mut Run, event: &Event) -> bool {
    if event.run_id() != run.id || run.status.is_terminal() {
        return false;
    }

    match event {
        Event::RunStarted { .. } => {}
        Event::RunStatusUpdate {
            status, task_index, ..
        } => {
            run.current_task = *task_index;
            if !status.is_terminal() {
                run.status = *status;
            }
        }
        Event::TaskNotice { message, .. } => run.notices.push(message.clone()),
        Event::LogBlock { text, .. } => run.log_blocks.push(text.clone()),
        Event::RunCompleted { result, .. } => {
            run.status = RunStatus::Completed;
            run.result = result.clone();
        }
        Event::RunError { error, .. } => {
            run.status = RunStatus::Failed;
            run.error = Some(error.clone());
        }
        Event::RunCancelled { .. } => run.status = RunStatus::Cancelled,
    }

    if run.status.is_terminal() && run.completed_at.is_none() {
        run.completed_at = Some(Utc::now());
    }
    true
}
