//! Event handling for the TUI.
//!
//! - Core events are folded into the local mirror of each run
//! - Key presses not used by the search form become operations for the core

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ps_core::state::run::{apply_event, create_run};
use ps_protocol::{Event, Op, Run};
use tokio::sync::mpsc::UnboundedSender;

use crate::form::SearchForm;
use crate::widgets::LogView;

/// Lines moved by PageUp/PageDown.
pub const PAGE: usize = 10;

/// Shown when Enter is pressed while a search is still running.
pub const SEARCH_IN_PROGRESS: &str = "A search is already running. Press Esc to cancel it.";

/// Fold an event from the core into `runs`.
///
/// `RunStarted` adds a run; every other event updates the run it names.
pub fn handle_core_event(runs: &mut Vec<Run>, event: Event) {
    if let Event::RunStarted { run_id, query } = &event {
        let mut run = create_run(query.clone());
        run.id = *run_id;
        runs.push(run);
        return;
    }

    match runs.iter_mut().find(|run| run.id == event.run_id()) {
        Some(run) => {
            apply_event(run, &event);
        }
        None => tracing::debug!(run_id = %event.run_id(), "event for unknown run"),
    }
}

/// Outcome of a key press the form did not consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    /// Show a message under the product field.
    Warn(&'static str),
    /// A search or cancellation was sent; clears any warning.
    Sent,
}

/// Handle a key press after the form had its chance.
///
/// The latest run is the one Enter and Esc act on.
pub fn handle_keyboard_event(
    key_event: KeyEvent,
    form: &SearchForm,
    runs: &[Run],
    log_view: &mut LogView,
    op_tx: &UnboundedSender<Op>,
) -> KeyAction {
    if key_event.kind != KeyEventKind::Press {
        return KeyAction::None;
    }

    let active = runs.last().filter(|run| !run.status.is_terminal());

    match key_event.code {
        KeyCode::Char('c') | KeyCode::Char('q')
            if key_event.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            KeyAction::Quit
        }
        KeyCode::Enter => {
            if active.is_some() {
                return KeyAction::Warn(SEARCH_IN_PROGRESS);
            }
            match form.submit() {
                Ok(op) => {
                    let _ = op_tx.send(op);
                    log_view.scroll_to_bottom();
                    KeyAction::Sent
                }
                Err(message) => KeyAction::Warn(message),
            }
        }
        KeyCode::Esc => match active {
            Some(run) => {
                let _ = op_tx.send(Op::CancelSearch { run_id: run.id });
                KeyAction::Sent
            }
            None => KeyAction::None,
        },
        KeyCode::Up => {
            log_view.scroll_up(1);
            KeyAction::None
        }
        KeyCode::Down => {
            log_view.scroll_down(1);
            KeyAction::None
        }
        KeyCode::PageUp => {
            log_view.scroll_up(PAGE);
            KeyAction::None
        }
        KeyCode::PageDown => {
            log_view.scroll_down(PAGE);
            KeyAction::None
        }
        KeyCode::Home => {
            log_view.scroll_to_top();
            KeyAction::None
        }
        KeyCode::End => {
            log_view.scroll_to_bottom();
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}
