//! # Flowchart Text Generation
//!
//! The language-model step that expands a flow description into a detailed
//! numbered outline. [`FlowGenerator`] is the seam the pipeline calls;
//! [`VeniceClient`] implements it against an OpenAI-style chat completions
//! endpoint. A failed or empty response is a terminal [`FlowError::Generation`]
//! for the request, with no retry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

pub const DEFAULT_BASE_URL: &str = "https://api.venice.ai/api/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b";
pub const API_KEY_ENV: &str = "VENICE_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const SYSTEM_PROMPT: &str = "You are a flowchart expert. Given a structured flow description, \
generate ONLY the flowchart in text form, with no extra commentary, notes, or explanations. \
Include all nodes, steps, and relationships exactly as described by the user. \
Use a clear, readable format with numbered main points (e.g., '1. Step One') and indented \
sub-points (e.g., '  - Sub-step 1.1'). Do NOT use markdown like asterisks for bolding or \
italics. Do NOT add any summary, notes, or explanations after the flowchart.";

/// Turns a flow description into outline text for the layout engine.
pub trait FlowGenerator {
    fn generate(&self, flow_description: &str) -> Result<String, FlowError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for the Venice API.
#[derive(Debug, Clone)]
pub struct VeniceClient {
    api_key: String,
    base_url: String,
    model: String,
}

impl VeniceClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Read the API key from `VENICE_API_KEY`.
    pub fn from_env() -> Result<Self, FlowError> {
        std::env::var(API_KEY_ENV)
            .map(Self::new)
            .map_err(|_| FlowError::Generation(format!("{} is not set", API_KEY_ENV)))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn request<'a>(&'a self, flow_description: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: flow_description,
                },
            ],
        }
    }
}

impl FlowGenerator for VeniceClient {
    fn generate(&self, flow_description: &str) -> Result<String, FlowError> {
        log::debug!("Requesting flowchart text from {}", self.endpoint());
        let mut response = agent()
            .post(&self.endpoint())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(self.request(flow_description))
            .map_err(|e| FlowError::Generation(format!("Venice API request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| {
                FlowError::Generation(format!("Failed to read Venice API response: {}", e))
            })?;

        match serde_json::from_str::<ChatResponse>(&body) {
            Ok(parsed) => extract_content(parsed),
            Err(_) if !status.is_success() => Err(FlowError::Generation(format!(
                "Venice API returned {}: {}",
                status,
                body.trim()
            ))),
            Err(e) => Err(FlowError::Generation(format!(
                "Venice API returned invalid JSON: {}",
                e
            ))),
        }
    }
}

/// Agent that hands back error responses instead of failing on them, so
/// the API's `error` field reaches [`extract_content`].
fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .into()
}

fn extract_content(response: ChatResponse) -> Result<String, FlowError> {
    let Some(choice) = response.choices.into_iter().next() else {
        let reason = match response.error {
            Some(serde_json::Value::String(msg)) => msg,
            Some(other) => other.to_string(),
            None => "No choices returned".to_string(),
        };
        return Err(FlowError::Generation(format!("Venice API error: {}", reason)));
    };

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(FlowError::Generation(
            "Venice API returned an empty message".to_string(),
        )),
    }
}
