//! # Outline Pre-formatter
//!
//! Groups a user's raw outline into sections (a numbered header plus its
//! items) and writes them out as the flow description sent to the
//! text-generation service:
//!
//! ```text
//! - 1. Plan
//!   - gather requirements
//!   ↓ (Next main step)
//! - 2. Build
//! ```
//!
//! Input without any numbered header is passed through trimmed.

use regex::Regex;
use std::sync::OnceLock;

static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
static SUB_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
static BULLET_REGEX: OnceLock<Regex> = OnceLock::new();

fn header_regex() -> &'static Regex {
    HEADER_REGEX
        .get_or_init(|| Regex::new(r"^(\d+\.)\s+(.*)").expect("Failed to compile header regex"))
}

fn sub_number_regex() -> &'static Regex {
    SUB_NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"^(\d+\.\d+)\s+(.*)").expect("Failed to compile sub-number regex")
    })
}

fn bullet_regex() -> &'static Regex {
    BULLET_REGEX
        .get_or_init(|| Regex::new(r"^[-*]\s+(.*)").expect("Failed to compile bullet regex"))
}

const NEXT_STEP_MARKER: &str = "  ↓ (Next main step)";

/// A numbered header and the lines grouped under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: String,
    pub items: Vec<String>,
}

/// Group outline lines into sections. Lines before the first header are
/// dropped.
pub fn parse_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = header_regex().captures(line) {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(Section {
                header: format!("{} {}", &caps[1], &caps[2]),
                items: Vec::new(),
            });
            continue;
        }

        let Some(section) = current.as_mut() else {
            continue;
        };
        let item = if let Some(caps) = sub_number_regex().captures(line) {
            format!("{} {}", &caps[1], &caps[2])
        } else if let Some(caps) = bullet_regex().captures(line) {
            caps[1].to_string()
        } else {
            line.to_string()
        };
        section.items.push(item);
    }

    if let Some(section) = current {
        sections.push(section);
    }
    sections
}

/// Build the flow description for a raw outline.
pub fn describe_flow(text: &str) -> String {
    let sections = parse_sections(text);
    if sections.is_empty() {
        return text.trim().to_string();
    }

    let mut desc = String::new();
    for (idx, section) in sections.iter().enumerate() {
        desc.push_str(&format!("- {}\n", section.header));
        for item in &section.items {
            desc.push_str(&format!("  - {}\n", item));
        }
        if idx < sections.len() - 1 {
            desc.push_str(NEXT_STEP_MARKER);
            desc.push('\n');
        }
    }
    desc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections() {
        let sections = parse_sections("intro\n1. Plan\n- gather\n1.1 scope it\nfree text\n\n2.  Build");
        assert_eq!(
            sections,
            vec![
                Section {
                    header: "1. Plan".to_string(),
                    items: vec![
                        "gather".to_string(),
                        "1.1 scope it".to_string(),
                        "free text".to_string(),
                    ],
                },
                Section {
                    header: "2. Build".to_string(),
                    items: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_describe_flow() {
        let desc = describe_flow("1. Plan\n  * gather\n2. Build\n3. Ship");
        assert_eq!(
            desc,
            "- 1. Plan\n  - gather\n  ↓ (Next main step)\n- 2. Build\n  ↓ (Next main step)\n- 3. Ship\n"
        );
    }

    #[test]
    fn test_no_sections_passes_through() {
        assert_eq!(describe_flow("  make tea, then drink it \n"), "make tea, then drink it");
        assert_eq!(describe_flow(""), "");
    }

    #[test]
    fn test_sub_number_is_not_a_header() {
        let sections = parse_sections("1. A\n1.2 nested");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items, vec!["1.2 nested".to_string()]);
    }
}
