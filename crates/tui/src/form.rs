//! Search form state: the sidebar settings plus the product query.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ps_core::llm::provider::resolve_api_key;
use ps_protocol::{ModelSelection, Op, ProviderKind, MAX_TEMPERATURE, MIN_TEMPERATURE};

use crate::event::EventStatus;

/// Temperature slider step.
pub const TEMPERATURE_STEP: f32 = 0.1;

/// Input field that receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Provider,
    Model,
    ApiKey,
    Temperature,
    Query,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::Provider,
        Field::Model,
        Field::ApiKey,
        Field::Temperature,
        Field::Query,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Why a search could not be submitted.
pub const MISSING_INPUT: &str = "Enter a product name and an API key to search.";

#[derive(Debug, Clone)]
pub struct SearchForm {
    pub selection: ModelSelection,
    pub query: String,
    pub focus: Field,
}

impl SearchForm {
    /// Start with the given selection and the cursor in the product field.
    pub fn new(selection: ModelSelection) -> Self {
        Self {
            selection,
            query: String::new(),
            focus: Field::Query,
        }
    }

    /// Whether Enter would start a search.
    pub fn can_search(&self) -> bool {
        !self.query.trim().is_empty() && self.selection.has_credentials()
    }

    /// The operation that starts a search, or why it cannot start.
    pub fn submit(&self) -> Result<Op, &'static str> {
        if !self.can_search() {
            return Err(MISSING_INPUT);
        }
        Ok(Op::StartSearch {
            query: self.query.trim().to_string(),
            selection: self.selection.clone(),
        })
    }

    /// Switch provider, resetting the model to its default and the key to
    /// whatever the environment holds for the new provider.
    pub fn cycle_provider(&mut self, forward: bool) {
        let all = ProviderKind::ALL;
        let current = all
            .iter()
            .position(|p| *p == self.selection.provider)
            .unwrap_or(0);
        let next = step(current, all.len(), forward);
        let provider = all[next];

        let api_key = resolve_api_key(provider, None, None).unwrap_or_default();
        self.selection = ModelSelection::new(provider)
            .with_temperature(self.selection.temperature)
            .with_api_key(api_key);
    }

    pub fn cycle_model(&mut self, forward: bool) {
        let models = self.selection.provider.models();
        let current = models
            .iter()
            .position(|m| *m == self.selection.model)
            .unwrap_or(0);
        self.selection.model = models[step(current, models.len(), forward)].to_string();
    }

    /// Move the temperature one step, staying on the 0.1 grid.
    pub fn nudge_temperature(&mut self, up: bool) {
        let tenths = (self.selection.temperature / TEMPERATURE_STEP).round();
        let tenths = if up { tenths + 1.0 } else { tenths - 1.0 };
        self.selection.temperature =
            (tenths * TEMPERATURE_STEP).clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
    }

    /// Append pasted text to the focused text field; newlines are dropped.
    pub fn paste(&mut self, text: &str) {
        if let Some(field) = self.text_field() {
            field.extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
        }
    }

    /// Handle keys that edit the form. Submission, scrolling and quitting
    /// are left to the caller.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> EventStatus {
        if key.kind != KeyEventKind::Press || key.modifiers.contains(KeyModifiers::CONTROL) {
            return EventStatus::NotConsumed;
        }

        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match self.focus {
                    Field::Provider => self.cycle_provider(forward),
                    Field::Model => self.cycle_model(forward),
                    Field::Temperature => self.nudge_temperature(forward),
                    Field::ApiKey | Field::Query => return EventStatus::NotConsumed,
                }
            }
            KeyCode::Char(c) => match self.text_field() {
                Some(field) => field.push(c),
                None => return EventStatus::NotConsumed,
            },
            KeyCode::Backspace => match self.text_field() {
                Some(field) => {
                    field.pop();
                }
                None => return EventStatus::NotConsumed,
            },
            _ => return EventStatus::NotConsumed,
        }
        EventStatus::Consumed
    }

    fn text_field(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::ApiKey => Some(&mut self.selection.api_key),
            Field::Query => Some(&mut self.query),
            _ => None,
        }
    }
}

fn step(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}
