//! The "Customization" sidebar: provider, model, API key and temperature.

use ps_protocol::{ModelSelection, MAX_TEMPERATURE};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::form::{Field, SearchForm};

pub const SIDEBAR_TITLE: &str = "Customization";

const SLIDER_WIDTH: usize = 10;
const MASK_CHAR: char = '•';
const MAX_MASK: usize = 20;

pub fn render_sidebar(frame: &mut Frame, area: Rect, form: &SearchForm) {
    let selection = &form.selection;
    let mut lines = Vec::new();

    push_field(
        &mut lines,
        "Choose an API",
        Line::from(selector(selection.provider.display_name())),
        form.focus == Field::Provider,
    );
    push_field(
        &mut lines,
        "Choose a model",
        Line::from(selector(&selection.model)),
        form.focus == Field::Model,
    );
    push_field(
        &mut lines,
        "Enter API Key",
        api_key_line(selection),
        form.focus == Field::ApiKey,
    );
    push_field(
        &mut lines,
        "Model Temperature",
        Line::from(temperature_slider(selection.temperature)),
        form.focus == Field::Temperature,
    );

    lines.push(Line::from(""));
    for help in [
        "Tab      next field",
        "←/→      change value",
        "Enter    search",
        "Esc      cancel search",
        "PgUp/Dn  scroll log",
        "Ctrl-C   quit",
    ] {
        lines.push(Line::styled(help, Style::default().fg(Color::DarkGray)));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(SIDEBAR_TITLE))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// The key as shown on screen: one mask character per key character.
pub fn mask_key(key: &str) -> String {
    std::iter::repeat(MASK_CHAR)
        .take(key.chars().count().min(MAX_MASK))
        .collect()
}

/// `0.7 [███████░░░]`
pub fn temperature_slider(temperature: f32) -> String {
    let filled = ((temperature / MAX_TEMPERATURE) * SLIDER_WIDTH as f32).round() as usize;
    let filled = filled.min(SLIDER_WIDTH);
    format!(
        "{temperature:.1} [{}{}]",
        "█".repeat(filled),
        "░".repeat(SLIDER_WIDTH - filled)
    )
}

fn selector(value: &str) -> String {
    format!("‹ {value} ›")
}

fn api_key_line(selection: &ModelSelection) -> Line<'static> {
    if !selection.provider.requires_api_key() {
        return Line::styled("not needed", Style::default().fg(Color::DarkGray));
    }
    if selection.api_key.is_empty() {
        return Line::styled(
            format!("{}…", selection.provider.api_key_hint()),
            Style::default().fg(Color::DarkGray),
        );
    }
    Line::from(mask_key(&selection.api_key))
}

fn push_field(lines: &mut Vec<Line<'static>>, label: &str, value: Line<'static>, focused: bool) {
    let label_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let marker = if focused { "> " } else { "  " };

    lines.push(Line::from(Span::styled(format!("{marker}{label}"), label_style)));
    let mut value = value;
    value.spans.insert(0, Span::raw("  "));
    lines.push(value);
    lines.push(Line::from(""));
}
