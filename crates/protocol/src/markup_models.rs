//! Color names understood by the inline markup of the agent log.
//!
//! The annotator wraps text in `:{color}[...]` directives; this module
//! defines the closed set of color names a directive may carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// A named color usable in a color directive.
///
/// Serialized in lowercase so config files can write `palette = ["red", "blue"]`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum MarkupColor {
    Red,
    Green,
    Blue,
    Orange,
    Violet,
    Gray,
    Rainbow,
}

impl MarkupColor {
    /// All colors, in declaration order.
    pub const ALL: [MarkupColor; 7] = [
        MarkupColor::Red,
        MarkupColor::Green,
        MarkupColor::Blue,
        MarkupColor::Orange,
        MarkupColor::Violet,
        MarkupColor::Gray,
        MarkupColor::Rainbow,
    ];

    /// The name used inside a directive, e.g. `red` in `:red[text]`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Orange => "orange",
            Self::Violet => "violet",
            Self::Gray => "gray",
            Self::Rainbow => "rainbow",
        }
    }

    /// The palette execution blocks cycle through by default.
    pub fn default_palette() -> Vec<MarkupColor> {
        vec![Self::Red, Self::Green, Self::Blue, Self::Orange]
    }
}

impl fmt::Display for MarkupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkupColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            "orange" => Ok(Self::Orange),
            "violet" => Ok(Self::Violet),
            "gray" | "grey" => Ok(Self::Gray),
            "rainbow" => Ok(Self::Rainbow),
            other => Err(format!("unknown color: {other}")),
        }
    }
}
