//! Turns annotated log markup into styled ratatui lines.

use ps_core::markup::{self, Segment, STAR_GLYPH};
use ps_protocol::MarkupColor;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const RAINBOW: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

/// Terminal color for a markup color.
pub fn terminal_color(color: MarkupColor) -> Color {
    match color {
        MarkupColor::Red => Color::Red,
        MarkupColor::Green => Color::Green,
        MarkupColor::Blue => Color::LightBlue,
        MarkupColor::Orange => Color::Rgb(255, 165, 0),
        MarkupColor::Violet => Color::Magenta,
        MarkupColor::Gray => Color::Gray,
        MarkupColor::Rainbow => Color::Reset,
    }
}

/// Split marked-up text into lines of styled spans.
///
/// A colored span that contains a newline continues on the next line in the
/// same color. A trailing newline does not produce an empty last line.
pub fn to_lines(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for segment in markup::parse(text) {
        match segment {
            Segment::Star => current.push(Span::styled(
                STAR_GLYPH,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Segment::Plain(text) => push_text(&mut lines, &mut current, &text, None),
            Segment::Colored { color, text } => {
                push_text(&mut lines, &mut current, &text, Some(color))
            }
        }
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn push_text(
    lines: &mut Vec<Line<'static>>,
    current: &mut Vec<Span<'static>>,
    text: &str,
    color: Option<MarkupColor>,
) {
    let mut parts = text.split('\n').peekable();
    while let Some(part) = parts.next() {
        if !part.is_empty() {
            match color {
                Some(MarkupColor::Rainbow) => current.extend(rainbow(part)),
                Some(color) => current.push(Span::styled(
                    part.to_string(),
                    Style::default().fg(terminal_color(color)),
                )),
                None => current.push(Span::raw(part.to_string())),
            }
        }
        if parts.peek().is_some() {
            lines.push(Line::from(std::mem::take(current)));
        }
    }
}

fn rainbow(text: &str) -> Vec<Span<'static>> {
    text.chars()
        .zip(RAINBOW.iter().cycle())
        .map(|(c, color)| Span::styled(c.to_string(), Style::default().fg(*color)))
        .collect()
}
