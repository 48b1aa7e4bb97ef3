//! Key handling result shared by the form and the app.

/// Whether a handler used a key press.
///
/// The search form sees keys first; anything it returns as `NotConsumed`
/// falls through to the app (submit, cancel, scroll, quit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Consumed,
    NotConsumed,
}
