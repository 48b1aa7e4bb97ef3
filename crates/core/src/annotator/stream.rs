//! The stream annotator.

use once_cell::sync::Lazy;
use ps_protocol::{MarkupColor, Role};
use regex::Regex;

use crate::annotator::sink::{ChunkSink, DisplaySink, NoticeSink};
use crate::markup::{color_span, STAR_MARKER};

/// Text the crew engine prints when an agent starts a new execution chain.
pub const EXECUTION_START_MARKER: &str = "Entering new CrewAgentExecutor chain";

/// Text the crew engine prints when an execution chain ends.
pub const FINISHED_CHAIN_MARKER: &str = "Finished chain.";

/// Role colors used when no roles are configured, in match order.
pub const DEFAULT_AGENT_COLORS: [(&str, MarkupColor); 3] = [
    ("Search Query Optimizer", MarkupColor::Blue),
    ("Price Analyzer", MarkupColor::Green),
    ("Data Retrieval Specialist", MarkupColor::Orange),
];

static ANSI_CSI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("ANSI pattern is valid"));

static TASK_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)("task"\s*:\s*"(.*?)"|task\s*:\s*([^\n]*))"#).expect("task pattern is valid")
});

static PRICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)price:\s*([\d.]+)").expect("price pattern is valid"));

static BEST_DEAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(best deal.*)").expect("best deal pattern is valid"));

/// Annotates agent log output and flushes it line by line.
///
/// One annotator serves one search run. Per chunk it:
///
/// 1. strips ANSI CSI color/erase codes,
/// 2. reports a `task: ...` label to the notice sink right away,
/// 3. wraps an execution-start marker in the next palette color,
/// 4. wraps role names in their own color,
/// 5. rewrites the first `price: N` as a green `Price: $N`,
/// 6. wraps `Finished chain.` in the current palette color,
/// 7. stages the result and, once the chunk holds a newline, renders
///    everything staged as one block.
///
/// The `best deal...` star is placed at flush time over the whole block, so
/// `"bes"` + `"t deal"` is still starred.
pub struct StreamAnnotator<D, N> {
    display: D,
    notices: N,
    /// Cleaned fragments of the line being assembled.
    buffer: Vec<String>,
    color_index: usize,
    palette: Vec<MarkupColor>,
    agent_colors: Vec<(String, MarkupColor)>,
    /// Trailing, incomplete escape sequence carried into the next chunk.
    pending_escape: String,
}

impl<D: DisplaySink, N: NoticeSink> StreamAnnotator<D, N> {
    /// Create an annotator with the default palette and role colors.
    pub fn new(display: D, notices: N) -> Self {
        Self {
            display,
            notices,
            buffer: Vec::new(),
            color_index: 0,
            palette: MarkupColor::default_palette(),
            agent_colors: DEFAULT_AGENT_COLORS
                .iter()
                .map(|(name, color)| (name.to_string(), *color))
                .collect(),
            pending_escape: String::new(),
        }
    }

    /// Replace the execution-block palette. An empty palette is ignored.
    pub fn with_palette(mut self, palette: Vec<MarkupColor>) -> Self {
        if palette.is_empty() {
            tracing::warn!("ignoring empty annotator palette");
        } else {
            self.palette = palette;
            self.color_index = 0;
        }
        self
    }

    /// Replace the role colors. Names are matched in the given order.
    pub fn with_agent_colors(mut self, agent_colors: Vec<(String, MarkupColor)>) -> Self {
        self.agent_colors = agent_colors;
        self
    }

    /// Use the colors declared on `roles`; roles without a color are not highlighted.
    pub fn with_roles(self, roles: &[Role]) -> Self {
        let colors = roles
            .iter()
            .filter_map(|role| role.color.map(|color| (role.name.clone(), color)))
            .collect();
        self.with_agent_colors(colors)
    }

    /// Process one chunk of output.
    pub fn consume(&mut self, chunk: &str) {
        let cleaned = self.strip_control_codes(chunk);
        self.detect_task(&cleaned);
        let annotated = self.annotate(cleaned);
        self.buffer.push(annotated);

        if chunk.contains('\n') {
            self.flush();
        }
    }

    /// Render whatever is still staged, including an unfinished escape sequence.
    ///
    /// Called once the producer is done; does nothing when nothing is staged.
    pub fn finish(&mut self) {
        let pending = std::mem::take(&mut self.pending_escape);
        if !pending.is_empty() {
            self.buffer.push(pending);
        }
        if self.buffer.iter().any(|fragment| !fragment.is_empty()) {
            self.flush();
        }
        self.buffer.clear();
    }

    /// Position in the palette of the current execution block.
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Color of the current execution block.
    pub fn current_color(&self) -> MarkupColor {
        self.palette[self.color_index]
    }

    pub fn palette(&self) -> &[MarkupColor] {
        &self.palette
    }

    /// Annotated text waiting for a newline.
    pub fn staged(&self) -> String {
        self.buffer.concat()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn notices(&self) -> &N {
        &self.notices
    }

    /// Give back the sinks.
    pub fn into_sinks(self) -> (D, N) {
        (self.display, self.notices)
    }

    fn strip_control_codes(&mut self, chunk: &str) -> String {
        let mut input = std::mem::take(&mut self.pending_escape);
        input.push_str(chunk);

        if let Some(start) = partial_escape_start(&input) {
            self.pending_escape = input.split_off(start);
        }

        ANSI_CSI.replace_all(&input, "").into_owned()
    }

    fn detect_task(&mut self, cleaned: &str) {
        let Some(caps) = TASK_LABEL.captures(cleaned) else {
            return;
        };

        let value = caps
            .get(2)
            .filter(|m| !m.as_str().is_empty())
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().trim())
            .unwrap_or_default();

        if value.is_empty() {
            return;
        }

        tracing::debug!(task = value, "task label detected");
        self.notices.notice(&format!("⚙ Task: {value}"));
    }

    fn flush(&mut self) {
        let staged = self.buffer.concat();
        self.buffer.clear();

        self.display.render(&star_best_deal(staged), true);
    }

    fn annotate(&mut self, mut text: String) -> String {
        if text.contains(EXECUTION_START_MARKER) {
            self.color_index = (self.color_index + 1) % self.palette.len();
            text = text.replace(
                EXECUTION_START_MARKER,
                &color_span(self.current_color(), EXECUTION_START_MARKER),
            );
        }

        for (name, color) in &self.agent_colors {
            if !name.is_empty() && text.contains(name.as_str()) {
                text = text.replace(name.as_str(), &color_span(*color, name));
            }
        }

        if text.to_lowercase().contains("price:") {
            let found = PRICE
                .captures(&text)
                .map(|caps| (caps[0].to_string(), caps[1].to_string()));
            if let Some((matched, value)) = found {
                let highlighted = color_span(MarkupColor::Green, &format!("Price: ${value}"));
                text = text.replace(&matched, &highlighted);
            }
        }

        if text.contains(FINISHED_CHAIN_MARKER) {
            text = text.replace(
                FINISHED_CHAIN_MARKER,
                &color_span(self.current_color(), FINISHED_CHAIN_MARKER),
            );
        }

        text
    }
}

impl<D: DisplaySink, N: NoticeSink> ChunkSink for StreamAnnotator<D, N> {
    fn write(&mut self, chunk: &str) {
        self.consume(chunk);
    }

    fn finish(&mut self) {
        StreamAnnotator::finish(self);
    }
}

fn star_best_deal(text: String) -> String {
    if !text.to_lowercase().contains("best deal") {
        return text;
    }
    BEST_DEAL
        .replace_all(&text, format!("{STAR_MARKER} ${{1}}").as_str())
        .into_owned()
}

/// Byte offset where an unfinished CSI sequence (`ESC`, `ESC [`, `ESC [ 3 1`)
/// starts at the end of `text`.
fn partial_escape_start(text: &str) -> Option<usize> {
    let start = text.rfind('\x1b')?;
    let tail = &text[start + 1..];
    let unfinished = match tail.strip_prefix('[') {
        Some(params) => params.chars().all(|c| c.is_ascii_digit() || c == ';'),
        None => tail.is_empty(),
    };
    unfinished.then_some(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::sink::RecordingSink;

    fn annotator() -> StreamAnnotator<RecordingSink, RecordingSink> {
        StreamAnnotator::new(RecordingSink::new(), RecordingSink::new())
    }

    #[test]
    fn test_plain_text_passes_through() {
        let mut annotator = annotator();
        annotator.consume("nothing to see here\n");

        assert_eq!(
            annotator.display().renders,
            vec![("nothing to see here\n".to_string(), true)]
        );
        assert!(annotator.notices().notices.is_empty());
        assert_eq!(annotator.color_index(), 0);
    }

    #[test]
    fn test_strips_ansi_codes() {
        let mut annotator = annotator();
        annotator.consume("\x1b[1m\x1b[92m plain \x1b[00m\x1b[K\n");

        assert_eq!(annotator.display().last_render(), Some(" plain \n"));
    }

    #[test]
    fn test_malformed_escape_is_left_in_place() {
        let mut annotator = annotator();
        annotator.consume("\x1b[31x odd\n");

        assert_eq!(annotator.display().last_render(), Some("\x1b[31x odd\n"));
    }

    #[test]
    fn test_execution_marker_advances_palette() {
        let mut annotator = annotator();
        annotator.consume("\x1B[31mEntering new CrewAgentExecutor chain\x1B[0m\n");

        assert_eq!(annotator.color_index(), 1);
        assert_eq!(
            annotator.display().last_render(),
            Some(":green[Entering new CrewAgentExecutor chain]\n")
        );
    }

    #[test]
    fn test_palette_wraps_around() {
        let mut annotator = annotator();
        for _ in 0..4 {
            annotator.consume("> Entering new CrewAgentExecutor chain...\n");
        }

        assert_eq!(annotator.color_index(), 0);
        assert_eq!(
            annotator.display().last_render(),
            Some("> :red[Entering new CrewAgentExecutor chain]...\n")
        );
    }

    #[test]
    fn test_markers_in_separate_chunks_advance_twice() {
        let mut annotator = annotator();
        annotator.consume("> Entering new CrewAgentExecutor chain...");
        assert_eq!(annotator.color_index(), 1);

        annotator.consume(" > Entering new CrewAgentExecutor chain...\n");
        assert_eq!(annotator.color_index(), 2);
        assert_eq!(
            annotator.display().last_render(),
            Some(
                "> :green[Entering new CrewAgentExecutor chain]... > :blue[Entering new CrewAgentExecutor chain]...\n"
            )
        );
    }

    #[test]
    fn test_finished_chain_uses_current_color() {
        let mut annotator = annotator();
        annotator.consume("> Entering new CrewAgentExecutor chain...\n");
        annotator.consume("> Entering new CrewAgentExecutor chain...\n");
        annotator.consume("> Finished chain.\n");

        assert_eq!(annotator.color_index(), 2);
        assert_eq!(
            annotator.display().last_render(),
            Some("> :blue[Finished chain.]\n")
        );
    }

    #[test]
    fn test_task_notice_is_trimmed() {
        let mut annotator = annotator();
        annotator.consume("task: Optimize search\n");

        assert_eq!(
            annotator.notices().notices,
            vec!["⚙ Task: Optimize search".to_string()]
        );
    }

    #[test]
    fn test_task_notice_without_flush() {
        let mut annotator = annotator();
        annotator.consume("Starting Task:   Retrieve price data  ");

        assert_eq!(
            annotator.notices().notices,
            vec!["⚙ Task: Retrieve price data".to_string()]
        );
        assert!(annotator.display().renders.is_empty());
    }

    #[test]
    fn test_quoted_task_field() {
        let mut annotator = annotator();
        annotator.consume(r#"{"task": "Analyze prices", "agent": "Price Analyzer"}"#);

        assert_eq!(
            annotator.notices().notices,
            vec!["⚙ Task: Analyze prices".to_string()]
        );
    }

    #[test]
    fn test_empty_task_label_is_ignored() {
        let mut annotator = annotator();
        annotator.consume("task:   \n");

        assert!(annotator.notices().notices.is_empty());
    }

    #[test]
    fn test_price_highlight() {
        let mut annotator = annotator();
        annotator.consume("price: 19.99\n");

        let rendered = annotator.display().last_render().unwrap();
        assert_eq!(rendered, ":green[Price: $19.99]\n");
        assert!(!rendered.contains("price: 19.99"));
    }

    #[test]
    fn test_price_highlight_is_case_insensitive() {
        let mut annotator = annotator();
        annotator.consume("Amazon PRICE:  42\n");

        assert_eq!(
            annotator.display().last_render(),
            Some("Amazon :green[Price: $42]\n")
        );
    }

    #[test]
    fn test_one_price_per_chunk() {
        let mut annotator = annotator();
        annotator.consume("Amazon price: 10, ");
        annotator.consume("AliExpress price: 8\n");
        annotator.consume("eBay price: 7, Temu price: 6\n");

        let renders = &annotator.display().renders;
        assert_eq!(
            renders[0].0,
            "Amazon :green[Price: $10], AliExpress :green[Price: $8]\n"
        );
        assert_eq!(renders[1].0, "eBay :green[Price: $7], Temu price: 6\n");
    }

    #[test]
    fn test_best_deal_gets_star_and_keeps_case() {
        let mut annotator = annotator();
        annotator.consume("The Best Deal is on AliExpress\n");

        assert_eq!(
            annotator.display().last_render(),
            Some("The :star: Best Deal is on AliExpress\n")
        );
    }

    #[test]
    fn test_known_agents_are_colored() {
        let mut annotator = annotator();
        annotator.consume("Working Agent: Price Analyzer\n");

        assert_eq!(
            annotator.display().last_render(),
            Some("Working Agent: :green[Price Analyzer]\n")
        );
    }

    #[test]
    fn test_roles_replace_default_colors() {
        let role = Role {
            name: "Deal Hunter".to_string(),
            goal: "Find deals".to_string(),
            backstory: String::new(),
            color: Some(MarkupColor::Violet),
            allow_delegation: false,
        };
        let mut annotator = annotator().with_roles(&[role]);
        annotator.consume("Deal Hunter and Price Analyzer\n");

        assert_eq!(
            annotator.display().last_render(),
            Some(":violet[Deal Hunter] and Price Analyzer\n")
        );
    }

    #[test]
    fn test_several_rules_in_one_chunk() {
        let mut annotator = annotator();
        annotator.consume("Search Query Optimizer says best deal price: 5\n");

        assert_eq!(
            annotator.display().last_render(),
            Some(":blue[Search Query Optimizer] says :star: best deal :green[Price: $5]\n")
        );
    }

    #[test]
    fn test_split_chunks_flush_once() {
        let mut annotator = annotator();

        annotator.consume("bes");
        assert!(annotator.display().renders.is_empty());
        assert_eq!(annotator.staged(), "bes");

        annotator.consume("t deal! price: 5\n");
        assert_eq!(annotator.display().renders.len(), 1);

        let rendered = annotator.display().last_render().unwrap();
        assert!(rendered.contains(":star: best deal"));
        assert!(rendered.contains(":green[Price: $5]"));
        assert_eq!(annotator.staged(), "");
    }

    #[test]
    fn test_one_render_per_newline_chunk() {
        let mut annotator = annotator();
        let chunks = [
            "first line\nsecond line\n",
            "no newline",
            " still none",
            "\n",
            "Entering new CrewAgentExecutor chain price: 1 best deal Finished chain.\n",
        ];
        for chunk in chunks {
            annotator.consume(chunk);
        }

        assert_eq!(annotator.display().renders.len(), 3);
        assert_eq!(
            annotator.display().renders[1].0,
            "no newline still none\n"
        );
    }

    #[test]
    fn test_same_input_same_output() {
        let chunk = "just some ordinary agent chatter\n";

        let mut first = annotator();
        let mut second = annotator();
        first.consume(chunk);
        second.consume(chunk);

        assert_eq!(first.display(), second.display());
        assert_eq!(first.color_index(), second.color_index());
    }

    #[test]
    fn test_escape_split_across_chunks() {
        let mut annotator = annotator();
        annotator.consume("hello \x1b[3");
        annotator.consume("1mworld\x1b[0m\n");

        assert_eq!(annotator.display().last_render(), Some("hello world\n"));
    }

    #[test]
    fn test_lone_escape_held_until_next_chunk() {
        let mut annotator = annotator();
        annotator.consume("line one\n\x1b");
        assert_eq!(annotator.display().last_render(), Some("line one\n"));

        annotator.consume("[Kline two\n");
        assert_eq!(annotator.display().last_render(), Some("line two\n"));
    }

    #[test]
    fn test_finish_flushes_leftovers() {
        let mut annotator = annotator();
        annotator.consume("final answer without newline");
        annotator.finish();

        assert_eq!(
            annotator.display().last_render(),
            Some("final answer without newline")
        );

        annotator.finish();
        assert_eq!(annotator.display().renders.len(), 1);
    }

    #[test]
    fn test_empty_palette_is_ignored() {
        let annotator = annotator().with_palette(Vec::new());
        assert_eq!(annotator.palette(), MarkupColor::default_palette().as_slice());
    }

    #[test]
    fn test_custom_palette() {
        let mut annotator =
            annotator().with_palette(vec![MarkupColor::Gray, MarkupColor::Violet]);
        annotator.consume("Entering new CrewAgentExecutor chain\n");

        assert_eq!(annotator.current_color(), MarkupColor::Violet);
    }

    #[test]
    fn test_new_palette_restarts_cycle() {
        let mut annotator = annotator();
        for _ in 0..3 {
            annotator.consume("Entering new CrewAgentExecutor chain\n");
        }
        assert_eq!(annotator.color_index(), 3);

        let mut annotator = annotator.with_palette(vec![MarkupColor::Gray]);
        assert_eq!(annotator.color_index(), 0);
        assert_eq!(annotator.current_color(), MarkupColor::Gray);

        annotator.consume("Finished chain.\n");
        assert_eq!(
            annotator.display().last_render(),
            Some(":gray[Finished chain.]\n")
        );
    }

    #[test]
    fn test_partial_escape_start() {
        assert_eq!(partial_escape_start("abc\x1b"), Some(3));
        assert_eq!(partial_escape_start("abc\x1b[1;3"), Some(3));
        assert_eq!(partial_escape_start("abc\x1b[0m"), None);
        assert_eq!(partial_escape_start("abc"), None);
    }
}
