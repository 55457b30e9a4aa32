//! Groq completion provider.
//!
//! Speaks the OpenAI-compatible `chat/completions` REST endpoint.
//! Auth priority: config key → `GROQ_API_KEY`.
//!
//! Reasoning model support: DeepSeek R1 distill models emit their chain of
//! thought inside a `<think>` block ahead of the answer. This provider
//! drops everything through the closing tag and returns only the final
//! text.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::CompletionProvider;
use crate::error::{Result, TutorError};

/// Groq OpenAI-compatible REST API base.
const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default model when none is configured.
pub const DEFAULT_GROQ_MODEL: &str = "deepseek-r1-distill-llama-70b";

// Sampling options tuned for focused tutoring answers.
const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 2000;
const TOP_P: f64 = 0.95;

const THINK_CLOSE_TAG: &str = "</think>";

/// Groq chat-completions client.
pub struct GroqProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqProvider")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl GroqProvider {
    /// Build a provider with an explicit API key.
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Self::build_client(),
        }
    }

    /// Build from config, falling back to `GROQ_API_KEY` in the environment.
    ///
    /// Missing credentials are logged, not fatal: every completion call
    /// will surface the upstream auth error per-request instead.
    pub fn from_config(api_key: &str, model: &str) -> Self {
        let key = if api_key.is_empty() {
            std::env::var("GROQ_API_KEY").unwrap_or_default()
        } else {
            api_key.to_string()
        };
        if key.is_empty() {
            warn!("GROQ_API_KEY not found in environment; completion calls will fail");
        }
        Self::new(&key, model)
    }

    fn build_client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client")
    }

    fn api_url(&self) -> String {
        format!("{GROQ_API_BASE}/chat/completions")
    }

    /// Build the `chat/completions` request body for a system + user turn.
    pub fn build_request_body(&self, system: &str, user: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "top_p": TOP_P
        })
    }

    /// Extract the completion text from a chat-completions response,
    /// dropping any leading `<think>` reasoning block.
    pub fn extract_text(response: &Value) -> Option<String> {
        let content = response["choices"][0]["message"]["content"].as_str()?;
        Some(strip_reasoning(content).to_string())
    }
}

/// Everything through the last `</think>` tag is intermediate reasoning.
fn strip_reasoning(content: &str) -> &str {
    match content.rfind(THINK_CLOSE_TAG) {
        Some(idx) => content[idx + THINK_CLOSE_TAG.len()..].trim_start(),
        None => content,
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = self.build_request_body(system, user);

        debug!(model = %self.model, "Groq chat completion request");

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TutorError::Provider(format!("Groq request failed: {e}")))?;

        if response.status().is_success() {
            let json: Value = response.json().await.map_err(|e| {
                TutorError::Provider(format!("Failed to parse Groq response: {e}"))
            })?;
            return Self::extract_text(&json).ok_or_else(|| {
                TutorError::Provider("Groq response contained no completion text".into())
            });
        }

        let status = response.status().as_u16();
        let error_text = response.text().await.unwrap_or_default();

        // Try to extract a useful message from the Groq error body.
        let message = serde_json::from_str::<Value>(&error_text)
            .ok()
            .and_then(|v| {
                v["error"]["message"]
                    .as_str()
                    .map(|s| format!("Groq API error ({status}): {s}"))
            })
            .unwrap_or_else(|| format!("Groq API error ({status}): {error_text}"));

        Err(TutorError::Provider(message))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let provider = GroqProvider::new("key", DEFAULT_GROQ_MODEL);
        let body = provider.build_request_body("system prompt", "user turn");
        assert_eq!(body["model"], DEFAULT_GROQ_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "system prompt");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "user turn");
        assert_eq!(body["temperature"], 0.3);
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["top_p"], 0.95);
    }

    #[test]
    fn test_extract_text() {
        let response = json!({
            "choices": [{ "message": { "content": "the answer" } }]
        });
        assert_eq!(GroqProvider::extract_text(&response).unwrap(), "the answer");
    }

    #[test]
    fn test_extract_text_drops_reasoning_block() {
        let response = json!({
            "choices": [{ "message": {
                "content": "<think>\nlong chain of thought\n</think>\nthe answer"
            } }]
        });
        assert_eq!(GroqProvider::extract_text(&response).unwrap(), "the answer");
    }

    #[test]
    fn test_extract_text_missing_content() {
        let response = json!({ "choices": [] });
        assert!(GroqProvider::extract_text(&response).is_none());
    }

    #[test]
    fn test_strip_reasoning_without_tag_is_identity() {
        assert_eq!(strip_reasoning("plain answer"), "plain answer");
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = GroqProvider::new("super-secret", DEFAULT_GROQ_MODEL);
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
