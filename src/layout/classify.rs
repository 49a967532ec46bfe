//! Line classification.
//!
//! Every stripped line is tagged exactly once from its leading-token shape.
//! Whether a non-main line is a sub-point or plain text depends on the
//! engine's state, not on the line, so the tag here only separates main
//! points from everything else.

use regex::Regex;
use std::sync::OnceLock;

static MAIN_POINT_REGEX: OnceLock<Regex> = OnceLock::new();

fn main_point_regex() -> &'static Regex {
    // A leading integer, a period, then whitespace: "1. Start", "12.\tEnd".
    MAIN_POINT_REGEX
        .get_or_init(|| Regex::new(r"^\d+\.\s").expect("Failed to compile main point regex"))
}

/// The shape of a single input line, with whitespace already stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A numbered top-level step.
    MainPoint(&'a str),
    /// Any other non-empty line.
    Text(&'a str),
    Blank,
}

/// Classify a raw line. Leading and trailing whitespace is ignored.
pub fn classify(line: &str) -> LineKind<'_> {
    let stripped = line.trim();
    if stripped.is_empty() {
        LineKind::Blank
    } else if main_point_regex().is_match(stripped) {
        LineKind::MainPoint(stripped)
    } else {
        LineKind::Text(stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_point() {
        assert_eq!(classify("1. Start"), LineKind::MainPoint("1. Start"));
        assert_eq!(classify("  42. Deploy  "), LineKind::MainPoint("42. Deploy"));
    }

    #[test]
    fn test_number_without_space_is_text() {
        assert_eq!(classify("1.Start"), LineKind::Text("1.Start"));
        assert_eq!(classify("1.1 Sub-step"), LineKind::Text("1.1 Sub-step"));
        // Trailing whitespace is stripped before matching.
        assert_eq!(classify("3. "), LineKind::Text("3."));
    }

    #[test]
    fn test_blank() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify(" \t "), LineKind::Blank);
    }

    #[test]
    fn test_bullet_is_text() {
        assert_eq!(classify("- Detail"), LineKind::Text("- Detail"));
    }
}
