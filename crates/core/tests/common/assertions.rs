//! Assertions over the event stream of a search.

#![allow(dead_code)]

use ps_protocol::ipc::Event;
use ps_protocol::RunStatus;
use uuid::Uuid;

pub fn has_run_started(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::RunStarted { .. }))
}

pub fn has_run_completed(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::RunCompleted { .. }))
}

pub fn has_status(events: &[Event], status: RunStatus) -> bool {
    events
        .iter()
        .any(|e| matches!(e, Event::RunStatusUpdate { status: s, .. } if *s == status))
}

pub fn extract_run_id(events: &[Event]) -> Option<Uuid> {
    events.first().map(Event::run_id)
}

pub fn count_log_blocks(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::LogBlock { .. }))
        .count()
}

/// Concatenated text of every `LogBlock`, in arrival order.
pub fn transcript(events: &[Event]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            Event::LogBlock { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

pub fn notices(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::TaskNotice { message, .. } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

pub fn error_message(events: &[Event]) -> Option<String> {
    events.iter().find_map(|e| match e {
        Event::RunError { error, .. } => Some(error.clone()),
        _ => None,
    })
}

/// `RunStarted` comes first, exactly one terminal event comes last, and all
/// events belong to one run.
pub fn assert_event_sequence(events: &[Event]) {
    assert!(
        matches!(events.first(), Some(Event::RunStarted { .. })),
        "first event should be RunStarted, got {:?}",
        events.first()
    );

    let terminal: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_terminal())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(terminal, vec![events.len() - 1], "one terminal event, at the end");

    let run_id = events[0].run_id();
    assert!(events.iter().all(|e| e.run_id() == run_id));
}
