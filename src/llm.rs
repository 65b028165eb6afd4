//! OpenAI chat-completions client for persona responses
//!
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::error::OrchestratorError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Reusable OpenAI client (connection-pooled)
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Generate a completion for one persona turn.
    ///
    /// `system_prompt` carries the persona's personality; `context` is the
    /// transcript-so-far plus the enrichment briefing.
    pub async fn complete(&self, system_prompt: &str, context: &str) -> crate::Result<String> {
        if self.api_key.is_empty() {
            return Err(OrchestratorError::LlmError(
                "OPENAI_API_KEY not configured".to_string(),
            ));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            temperature: DEFAULT_TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: context.to_string(),
                },
            ],
        };

        info!(model = %self.model, "Calling OpenAI API");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("OpenAI API request failed: {}", e);
                OrchestratorError::LlmError(format!("OpenAI API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API error response: {}", error_text);
            return Err(OrchestratorError::LlmError(format!(
                "OpenAI API error: {}",
                error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to parse OpenAI response: {}", e);
            OrchestratorError::LlmError(format!("OpenAI parse error: {}", e))
        })?;

        let answer = chat_response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                OrchestratorError::LlmError("No response from OpenAI API".to_string())
            })?;

        Ok(answer)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
