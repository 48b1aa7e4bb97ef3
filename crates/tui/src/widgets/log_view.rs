//! Scrollable view of a run's annotated agent log.
//!
//! The log is rebuilt from the run's full transcript on every draw. While
//! following, the view sticks to the newest lines; scrolling up stops
//! following until the user returns to the bottom.

use ps_protocol::Run;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Text,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::widgets::markup_text::to_lines;

pub const LOG_TITLE: &str = "Agent log";

#[derive(Debug, Clone)]
pub struct LogView {
    /// Lines scrolled from the top; ignored while following.
    pub scroll_offset: usize,
    pub follow: bool,
}

impl LogView {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            follow: true,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, run: Option<&Run>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(LOG_TITLE)
            .border_style(Style::default().fg(Color::DarkGray));

        let lines = match run {
            Some(run) if !run.log_blocks.is_empty() => to_lines(&run.transcript()),
            Some(_) => vec!["Waiting for the first agent...".into()],
            None => vec!["Enter a product and press Enter to compare prices.".into()],
        };

        let total_lines = lines.len();
        let visible_lines = area.height.saturating_sub(2) as usize;
        let max = total_lines.saturating_sub(visible_lines);
        if self.follow || self.scroll_offset > max {
            self.scroll_offset = max;
        }
        if self.scroll_offset >= max {
            self.follow = true;
        }

        let paragraph = Paragraph::new(Text::from(lines))
            .block(block)
            .scroll((self.scroll_offset.min(u16::MAX as usize) as u16, 0));
        frame.render_widget(paragraph, area);

        if total_lines > visible_lines {
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(max + 1)
                .viewport_content_length(visible_lines)
                .position(self.scroll_offset);

            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.follow = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Scroll down; the next draw clamps the offset and resumes following at
    /// the bottom.
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.follow = false;
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
    }
}

impl Default for LogView {
    fn default() -> Self {
        Self::new()
    }
}
