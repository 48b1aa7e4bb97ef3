//! ANSI rendering of annotated log markup for headless output.

use colored::{Color, Colorize};
use ps_core::markup::{self, Segment, STAR_GLYPH};
use ps_protocol::MarkupColor;

const RAINBOW: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

/// Terminal color for a markup color. Rainbow has none; it is applied per character.
pub fn ansi_color(color: MarkupColor) -> Option<Color> {
    match color {
        MarkupColor::Red => Some(Color::Red),
        MarkupColor::Green => Some(Color::Green),
        MarkupColor::Blue => Some(Color::Blue),
        MarkupColor::Orange => Some(Color::TrueColor {
            r: 255,
            g: 165,
            b: 0,
        }),
        MarkupColor::Violet => Some(Color::Magenta),
        MarkupColor::Gray => Some(Color::BrightBlack),
        MarkupColor::Rainbow => None,
    }
}

/// Render a log block for the terminal.
///
/// Markup is only interpreted when `allow_raw_markup` is set; otherwise the
/// text is printed as received. Whether escape codes are emitted follows
/// `colored`'s global switch.
pub fn render_block(text: &str, allow_raw_markup: bool) -> String {
    if !allow_raw_markup {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for segment in markup::parse(text) {
        match segment {
            Segment::Plain(plain) => out.push_str(&plain),
            Segment::Star => out.push_str(&STAR_GLYPH.yellow().bold().to_string()),
            Segment::Colored { color, text } => match ansi_color(color) {
                Some(ansi) => out.push_str(&text.color(ansi).to_string()),
                None => out.push_str(&rainbow(&text)),
            },
        }
    }
    out
}

fn rainbow(text: &str) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| c.to_string().color(RAINBOW[i % RAINBOW.len()]).to_string())
        .collect()
}
