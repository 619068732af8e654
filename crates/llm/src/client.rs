//! Blocking chat-completions client.
//!
//! Sends one fully-rendered prompt as a single user-role message and
//! returns the first choice's text. The pipeline's two stages each
//! make exactly one call here per question.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ResolvedLlmConfig;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Low temperature keeps the two positional response contracts stable.
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 1024;

/// Error type for completion requests.
#[derive(Debug)]
pub enum CompletionError {
    /// No API key configured
    MissingKey,
    /// Network error
    Network(String),
    /// API error response with status code
    Api { status: u16, message: String },
    /// Response body did not parse
    Parse(String),
    /// Response parsed but carried no choices
    EmptyResponse,
}

impl std::fmt::Display for CompletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionError::MissingKey => write!(f, "API key not configured"),
            CompletionError::Network(msg) => write!(f, "Network error: {}", msg),
            CompletionError::Api { status, message } => {
                write!(f, "API error ({}): {}", status, message)
            }
            CompletionError::Parse(msg) => write!(f, "Failed to parse response: {}", msg),
            CompletionError::EmptyResponse => write!(f, "No choices in response"),
        }
    }
}

impl std::error::Error for CompletionError {}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// Completion-service client (blocking).
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::blocking::Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl CompletionClient {
    /// Create a client from resolved configuration.
    pub fn new(config: &ResolvedLlmConfig) -> Result<Self, CompletionError> {
        let api_key = config.api_key.clone().ok_or(CompletionError::MissingKey)?;
        Ok(Self::with_parts(&config.api_base, &config.model, &api_key))
    }

    /// Create a client with explicit parts (tests point `api_base` at
    /// a mock server).
    pub fn with_parts(api_base: &str, model: &str, api_key: &str) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("tabqa/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the model's free-form text.
    pub fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let url = format!("{}{}", self.api_base, COMPLETIONS_PATH);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}
