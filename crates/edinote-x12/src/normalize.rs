//! Delimiter normalization and presentation formats.
//!
//! Files arrive either tilde-separated on one line or one segment per line
//! (often with CRLF endings). Everything is normalized to the expanded form on
//! load; the compact form is a display transform on top of it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TERMINATOR_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~\s*").expect("valid terminator regex"));
static NEWLINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("valid newline regex"));

/// Expanded form: every terminator followed by exactly one newline, no blank
/// lines, no surrounding whitespace.
pub fn normalize(raw: &str) -> String {
    let raw = strip_bom(raw);
    let terminated = TERMINATOR_WS.replace_all(raw, "~\n");
    NEWLINE_RUN
        .replace_all(&terminated, "\n")
        .trim()
        .to_string()
}

/// Drop a leading UTF-8 byte-order mark, as left by Windows exports.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Compact form: drops the newline after each terminator, keeping the terminators.
pub fn to_compact(normalized: &str) -> String {
    normalized.replace("~\n", "~")
}

/// How a normalized document is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// One segment per line.
    #[default]
    Expanded,
    /// Segments concatenated into a single stream.
    Compact,
}

impl Format {
    pub fn toggle(self) -> Self {
        match self {
            Format::Expanded => Format::Compact,
            Format::Compact => Format::Expanded,
        }
    }

    /// Render already-normalized text in this format.
    pub fn render<'a>(&self, normalized: &'a str) -> Cow<'a, str> {
        match self {
            Format::Expanded => Cow::Borrowed(normalized),
            Format::Compact => Cow::Owned(to_compact(normalized)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Format::Expanded => "Pretty",
            Format::Compact => "Compact",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Expanded => write!(f, "expanded"),
            Format::Compact => write!(f, "compact"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expanded" | "pretty" => Ok(Format::Expanded),
            "compact" => Ok(Format::Compact),
            other => Err(format!("unknown format `{other}` (expected expanded|compact)")),
        }
    }
}
