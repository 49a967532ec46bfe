//! Structured error types for the flowchart pipeline.
//!
//! Layout never fails and font resolution only degrades, so the variants
//! here cover the real error sources: the text-generation collaborator,
//! PNG encoding, and loading a render configuration.

use thiserror::Error;

/// The unified error type returned by the public `flowtext` API.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The text-generation service returned no usable content.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The finished canvas could not be encoded as PNG.
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// A render configuration failed to parse.
    #[error("Failed to parse config: {source}{}", format_hint(.hint))]
    Config {
        source: serde_json::Error,
        hint: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Config files are a single JSON object, e.g. { \"padding\": 32 }. Check for trailing commas or unquoted keys.".to_string()
            }
            serde_json::error::Category::Data => {
                "Field names are camelCase (lineSpacing, maxWidth, fonts.fontDir); sizes are whole pixels and colors are { \"r\", \"g\", \"b\" }.".to_string()
            }
            serde_json::error::Category::Eof => {
                "The config ended early. Is a closing brace missing?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FlowError::Config { source: e, hint }
    }
}
