//! Inline colour markup carried in agent reports
//!
//! Reports are plain text with ANSI SGR escapes (`ESC [ <params> m`) marking
//! colour changes. The agent paints with [`paint`], the gateway turns a line
//! back into coloured runs with [`parse`]. A tag stays active until the next
//! one; there is no nesting.

use std::fmt::Display;
use std::sync::OnceLock;

use regex::Regex;

/// Semantic colour of a run of report text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorTag {
    /// Report titles (blue)
    Title,
    /// Timings and min/max/avg (green)
    Success,
    /// TTL values (yellow)
    Warning,
    /// Packet loss (red)
    Error,
    /// Section headers (cyan)
    Info,
    /// Reset / untagged text
    #[default]
    Default,
}

impl ColorTag {
    /// SGR escape selecting this colour
    pub const fn sgr(self) -> &'static str {
        match self {
            ColorTag::Title => "\x1b[34m",
            ColorTag::Success => "\x1b[32m",
            ColorTag::Warning => "\x1b[33m",
            ColorTag::Error => "\x1b[31m",
            ColorTag::Info => "\x1b[36m",
            ColorTag::Default => "\x1b[0m",
        }
    }

    /// Colour after applying one SGR parameter list to `self`.
    ///
    /// Unknown parameters (bold, underline, background colours, ...) leave
    /// the colour untouched; an empty list is a reset.
    fn apply(self, params: &str) -> ColorTag {
        if params.is_empty() {
            return ColorTag::Default;
        }
        params.split(';').fold(self, |color, param| match param {
            "" | "0" | "39" => ColorTag::Default,
            "31" => ColorTag::Error,
            "32" => ColorTag::Success,
            "33" => ColorTag::Warning,
            "34" => ColorTag::Title,
            "36" => ColorTag::Info,
            _ => color,
        })
    }
}

/// A contiguous run of text sharing one colour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSegment {
    pub text: String,
    pub tag: ColorTag,
}

impl MarkupSegment {
    pub fn new(text: impl Into<String>, tag: ColorTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

fn sgr_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[([0-9;]*)m").unwrap())
}

fn escape_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").unwrap())
}

/// Wrap `text` in `tag` followed by a reset
pub fn paint(tag: ColorTag, text: impl Display) -> String {
    format!("{}{}{}", tag.sgr(), text, ColorTag::Default.sgr())
}

/// Remove every ANSI escape sequence from `text`
pub fn strip(text: &str) -> String {
    escape_pattern().replace_all(text, "").into_owned()
}

enum Token<'a> {
    Text(&'a str),
    Sgr(&'a str),
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0;
    for caps in sgr_pattern().captures_iter(input) {
        let (Some(whole), Some(params)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            tokens.push(Token::Text(&input[cursor..whole.start()]));
        }
        tokens.push(Token::Sgr(params.as_str()));
        cursor = whole.end();
    }
    if cursor < input.len() {
        tokens.push(Token::Text(&input[cursor..]));
    }
    tokens
}

/// Split a marked-up string into coloured segments.
///
/// Colour starts at [`ColorTag::Default`] for every call. Fragments that are
/// empty or blank once stray escapes are removed produce no segment; kept
/// fragments retain their whitespace.
pub fn parse(input: &str) -> Vec<MarkupSegment> {
    let (_, segments) = tokenize(input).into_iter().fold(
        (ColorTag::Default, Vec::new()),
        |(color, mut segments), token| match token {
            Token::Sgr(params) => (color.apply(params), segments),
            Token::Text(fragment) => {
                let clean = strip(fragment);
                if !clean.trim().is_empty() {
                    segments.push(MarkupSegment::new(clean, color));
                }
                (color, segments)
            }
        },
    );
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_green_then_plain() {
        let segments = parse("\x1b[32mOK\x1b[0m plain");
        assert_eq!(
            segments,
            vec![
                MarkupSegment::new("OK", ColorTag::Success),
                MarkupSegment::new(" plain", ColorTag::Default),
            ]
        );
    }

    #[test]
    fn test_untagged_text_is_default() {
        let segments = parse("no tags at all");
        assert_eq!(segments, vec![MarkupSegment::new("no tags at all", ColorTag::Default)]);
    }

    #[test]
    fn test_blank_fragments_are_dropped() {
        let line = format!("{} {}", paint(ColorTag::Title, "[PING]"), paint(ColorTag::Info, "x"));
        let segments = parse(&line);
        assert_eq!(
            segments,
            vec![
                MarkupSegment::new("[PING]", ColorTag::Title),
                MarkupSegment::new("x", ColorTag::Info),
            ]
        );
        assert!(parse("\x1b[31m\x1b[0m   ").is_empty());
    }

    #[test]
    fn test_color_persists_until_superseded() {
        let segments = parse("\x1b[33mTTL 64 and more\x1b[31m loss");
        assert_eq!(segments[0].tag, ColorTag::Warning);
        assert_eq!(segments[1], MarkupSegment::new(" loss", ColorTag::Error));
    }

    #[test]
    fn test_compound_and_unknown_parameters() {
        assert_eq!(parse("\x1b[1;32mbold green")[0].tag, ColorTag::Success);
        // bold alone keeps the current colour
        let segments = parse("\x1b[36mA\x1b[1mB");
        assert_eq!(segments[1], MarkupSegment::new("B", ColorTag::Info));
        // ESC [ m is a reset
        assert_eq!(parse("\x1b[34mA\x1b[mB")[1].tag, ColorTag::Default);
    }

    #[test]
    fn test_malformed_escapes_never_leak_into_text() {
        let segments = parse("\x1b[32mok\x1b[2K cleared");
        assert_eq!(segments, vec![MarkupSegment::new("ok cleared", ColorTag::Success)]);
        // an unterminated escape is left alone rather than swallowing text
        assert_eq!(strip("a\x1b[31"), "a\x1b[31");
    }

    #[test]
    fn test_strip_removes_all_escapes() {
        let painted = format!("{} hop {}", paint(ColorTag::Warning, "1"), paint(ColorTag::Success, "2ms"));
        assert_eq!(strip(&painted), "1 hop 2ms");
        assert_eq!(strip("\x1b[?25lhidden cursor\x1b[?25h"), "hidden cursor");
    }

    #[test]
    fn test_paint_round_trips_through_parse() {
        let painted = paint(ColorTag::Error, "12%");
        assert_eq!(parse(&painted), vec![MarkupSegment::new("12%", ColorTag::Error)]);
    }
}
