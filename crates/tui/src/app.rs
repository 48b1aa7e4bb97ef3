//! TUI application state and event loop.
//!
//! `App` holds the search form, a mirror of every run built from core
//! events, and the log view. Its loop uses `tokio::select!` over core events
//! and terminal input.

use anyhow::Result;
use crossterm::event::KeyEvent;
use ps_protocol::{Event, Op, Run, RunStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_stream::StreamExt;

use crate::event::EventStatus;
use crate::event_handler::{self, KeyAction};
use crate::form::{Field, SearchForm};
use crate::tui::{Tui, TuiEvent};
use crate::widgets::{render_sidebar, LogView};

pub const TITLE: &str = "Real-time Price Comparison App";
pub const SUBTITLE: &str = "Compare product prices across multiple stores in real-time.";
pub const QUERY_LABEL: &str = "Enter product name or SKU";
pub const SEARCHING: &str = "Searching for the best prices...";
pub const COMPLETE: &str = "Search complete!";

const SIDEBAR_WIDTH: u16 = 32;
const RESULT_HEIGHT: u16 = 8;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const SPINNER_INTERVAL: Duration = Duration::from_millis(120);

pub struct App {
    pub form: SearchForm,
    /// Every run started in this session, oldest first.
    pub runs: Vec<Run>,
    pub log_view: LogView,
    /// Message shown under the product field until the next edit.
    pub warning: Option<&'static str>,
    pub op_tx: UnboundedSender<Op>,
    pub event_rx: UnboundedReceiver<Event>,
    pub should_exit: bool,
    tick: usize,
}

impl App {
    pub fn new(
        form: SearchForm,
        op_tx: UnboundedSender<Op>,
        event_rx: UnboundedReceiver<Event>,
    ) -> Self {
        Self {
            form,
            runs: Vec::new(),
            log_view: LogView::new(),
            warning: None,
            op_tx,
            event_rx,
            should_exit: false,
            tick: 0,
        }
    }

    /// Run until the user quits.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();
        let frames = tui.frame_requester();
        frames.schedule_frame();

        while !self.should_exit {
            select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_core_event(event);
                    frames.schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    match tui_event {
                        TuiEvent::Key(key_event) => {
                            self.handle_key_event(key_event);
                            frames.schedule_frame();
                        }
                        TuiEvent::Paste(text) => {
                            self.form.paste(&text);
                            frames.schedule_frame();
                        }
                        TuiEvent::Draw => {
                            tui.draw(|frame| self.render(frame))?;
                            if self.active_run().is_some() {
                                self.tick = self.tick.wrapping_add(1);
                                frames.schedule_frame_in(SPINNER_INTERVAL);
                            }
                        }
                    }
                }
                else => break,
            }
        }

        Ok(())
    }

    /// The run shown on screen: the most recent one.
    pub fn current_run(&self) -> Option<&Run> {
        self.runs.last()
    }

    pub fn active_run(&self) -> Option<&Run> {
        self.current_run().filter(|run| !run.status.is_terminal())
    }

    pub fn handle_core_event(&mut self, event: Event) {
        event_handler::handle_core_event(&mut self.runs, event);
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if self.form.handle_key_event(key_event) == EventStatus::Consumed {
            self.warning = None;
            return;
        }

        match event_handler::handle_keyboard_event(
            key_event,
            &self.form,
            &self.runs,
            &mut self.log_view,
            &self.op_tx,
        ) {
            KeyAction::Quit => self.should_exit = true,
            KeyAction::Warn(message) => self.warning = Some(message),
            KeyAction::Sent => self.warning = None,
            KeyAction::None => {}
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(frame.area());

        render_sidebar(frame, columns[0], &self.form);
        self.render_main(frame, columns[1]);
    }

    fn render_main(&mut self, frame: &mut Frame, area: Rect) {
        let show_result = self
            .current_run()
            .is_some_and(|run| matches!(run.status, RunStatus::Completed | RunStatus::Failed));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(if show_result { RESULT_HEIGHT } else { 0 }),
            ])
            .split(area);

        let header = vec![
            Line::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
            Line::styled(SUBTITLE, Style::default().fg(Color::Gray)),
        ];
        frame.render_widget(Paragraph::new(header), rows[0]);

        self.render_query(frame, rows[1]);
        frame.render_widget(Paragraph::new(self.status_line()), rows[2]);
        frame.render_widget(Paragraph::new(self.banner_line()), rows[3]);

        let run = self.runs.last();
        self.log_view.render(frame, rows[4], run);

        if show_result {
            self.render_result(frame, rows[5]);
        }
    }

    fn render_query(&self, frame: &mut Frame, area: Rect) {
        let focused = self.form.focus == Field::Query;
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let cursor = if focused { "_" } else { "" };

        let paragraph = Paragraph::new(format!("> {}{cursor}", self.form.query)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(QUERY_LABEL)
                .border_style(border),
        );
        frame.render_widget(paragraph, area);
    }

    fn status_line(&self) -> Line<'static> {
        if let Some(warning) = self.warning {
            return Line::styled(warning, Style::default().fg(Color::Yellow));
        }

        let Some(run) = self.current_run() else {
            return Line::from("");
        };
        match run.status {
            RunStatus::Pending | RunStatus::Running => Line::from(vec![
                Span::styled(
                    SPINNER[self.tick % SPINNER.len()],
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(format!(" {SEARCHING}")),
            ]),
            RunStatus::Completed => Line::styled(
                COMPLETE,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            RunStatus::Failed => Line::styled("Search failed.", Style::default().fg(Color::Red)),
            RunStatus::Cancelled => {
                Line::styled("Search cancelled.", Style::default().fg(Color::DarkGray))
            }
        }
    }

    /// The latest task notice of the current run.
    fn banner_line(&self) -> Line<'static> {
        match self.current_run().and_then(|run| run.notices.last()) {
            Some(notice) => Line::styled(notice.clone(), Style::default().fg(Color::Cyan)),
            None => Line::from(""),
        }
    }

    fn render_result(&self, frame: &mut Frame, area: Rect) {
        let Some(run) = self.current_run() else {
            return;
        };

        let (title, body, style) = match (&run.status, &run.error) {
            (RunStatus::Failed, Some(error)) => (
                "Error",
                error.clone(),
                Style::default().fg(Color::Red),
            ),
            _ => ("Result", run.result.clone(), Style::default()),
        };

        let paragraph = Paragraph::new(body)
            .style(style)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(style),
            );
        frame.render_widget(paragraph, area);
    }
}
