//! Inline markup used in the annotated agent log.
//!
//! Two directives exist:
//! - `:{color}[text]` renders `text` in a named [`MarkupColor`]
//! - `:star:` renders a star glyph
//!
//! Anything else is plain text. The annotator produces markup with
//! [`color_span`] and [`STAR_MARKER`]; front ends turn it back into styled
//! output with [`parse`].

use ps_protocol::MarkupColor;

/// The star marker placed in front of "best deal" mentions.
pub const STAR_MARKER: &str = ":star:";

/// Glyph the star marker renders as.
pub const STAR_GLYPH: &str = "★";

/// Wrap `text` in a color directive.
pub fn color_span(color: MarkupColor, text: &str) -> String {
    format!(":{color}[{text}]")
}

/// A run of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Colored { color: MarkupColor, text: String },
    Star,
}

/// Split marked-up text into segments.
///
/// Directives with an unknown color or a missing closing bracket are kept
/// as plain text. Directives do not nest; the first `]` closes a span.
pub fn parse(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find(':') {
        plain.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix(STAR_MARKER) {
            flush_plain(&mut plain, &mut segments);
            segments.push(Segment::Star);
            rest = after;
            continue;
        }

        if let Some((color, text, after)) = parse_color_span(tail) {
            flush_plain(&mut plain, &mut segments);
            segments.push(Segment::Colored {
                color,
                text: text.to_string(),
            });
            rest = after;
            continue;
        }

        plain.push(':');
        rest = &tail[1..];
    }

    plain.push_str(rest);
    flush_plain(&mut plain, &mut segments);
    segments
}

/// Remove all directives, keeping only the text they carry.
pub fn strip(input: &str) -> String {
    parse(input)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain(text) | Segment::Colored { text, .. } => text,
            Segment::Star => STAR_GLYPH.to_string(),
        })
        .collect()
}

/// Parse `:{color}[text]` at the start of `tail`.
fn parse_color_span(tail: &str) -> Option<(MarkupColor, &str, &str)> {
    let body = tail.strip_prefix(':')?;
    let open = body.find('[')?;
    let name = &body[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let color = name.parse::<MarkupColor>().ok()?;

    let inner = &body[open + 1..];
    let close = inner.find(']')?;
    Some((color, &inner[..close], &inner[close + 1..]))
}

fn flush_plain(plain: &mut String, segments: &mut Vec<Segment>) {
    if !plain.is_empty() {
        segments.push(Segment::Plain(std::mem::take(plain)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_span_format() {
        assert_eq!(color_span(MarkupColor::Green, "Price: $5"), ":green[Price: $5]");
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(
            parse("nothing special: here"),
            vec![Segment::Plain("nothing special: here".to_string())]
        );
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_mixed_directives() {
        let segments = parse("> :red[Entering new CrewAgentExecutor chain]...\n:star: best deal");

        assert_eq!(
            segments,
            vec![
                Segment::Plain("> ".to_string()),
                Segment::Colored {
                    color: MarkupColor::Red,
                    text: "Entering new CrewAgentExecutor chain".to_string(),
                },
                Segment::Plain("...\n".to_string()),
                Segment::Star,
                Segment::Plain(" best deal".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_unknown_color_is_plain() {
        assert_eq!(
            parse(":purple[text]"),
            vec![Segment::Plain(":purple[text]".to_string())]
        );
    }

    #[test]
    fn test_parse_unterminated_span_is_plain() {
        assert_eq!(
            parse("a :blue[never closed"),
            vec![Segment::Plain("a :blue[never closed".to_string())]
        );
    }

    #[test]
    fn test_strip_keeps_text() {
        assert_eq!(
            strip(":star: :green[Price: $19.99] from :blue[Search Query Optimizer]"),
            "★ Price: $19.99 from Search Query Optimizer"
        );
    }
}
