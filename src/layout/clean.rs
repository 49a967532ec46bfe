//! Cleaning of generated outline text.
//!
//! The text-generation service is asked for a plain numbered outline but
//! still emits markdown emphasis, bullet markers and trailing commentary.
//! [`clean`] strips those before the outline reaches the layout engine.

use regex::Regex;
use std::sync::OnceLock;

static BULLET_REGEX: OnceLock<Regex> = OnceLock::new();
static NOTE_REGEX: OnceLock<Regex> = OnceLock::new();

fn bullet_regex() -> &'static Regex {
    // Repeated markers go in one match so a second pass finds nothing.
    BULLET_REGEX.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:[*\-][ \t]+)+").expect("Failed to compile bullet regex")
    })
}

fn note_regex() -> &'static Regex {
    NOTE_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\n\s*note:").expect("Failed to compile note regex")
    })
}

/// Remove emphasis markup, leading bullet markers and any trailing
/// `Note:` commentary, then trim the result.
///
/// Idempotent: `clean(&clean(s)) == clean(s)`.
pub fn clean(text: &str) -> String {
    let without_emphasis = text.replace('*', "");
    let without_bullets = bullet_regex().replace_all(&without_emphasis, "");
    let kept = match note_regex().find(&without_bullets) {
        Some(m) => &without_bullets[..m.start()],
        None => &without_bullets[..],
    };
    kept.trim().to_string()
}
