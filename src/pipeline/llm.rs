//! Chat-model interaction: the [`ChatModel`] seam and the Ollama client.
//!
//! This stage is intentionally thin — the prompt lives in
//! [`crate::prompts`] and the reply is handed downstream untouched, so the
//! table scanner sees exactly what the model said.
//!
//! ## Why a trait for one provider?
//!
//! The only supported endpoint is a local Ollama server, but correctness of
//! the year filtering and the table shape is entirely the model's doing and
//! cannot be asserted deterministically. The trait is the seam tests use to
//! inject fixed replies and exercise everything downstream of the model
//! without a server.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::ModelReply;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// A chat endpoint that answers one user-role message with text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Identifier used in logs and stats, e.g. "ollama/llama3.2".
    fn id(&self) -> String;

    /// Send a single user-role message and return the assistant's reply.
    ///
    /// No retry, no streaming — the full reply is buffered before returning.
    async fn chat(&self, prompt: &str) -> Result<ModelReply, ExtractError>;
}

/// Client for a local Ollama server's `/api/chat` endpoint.
pub struct OllamaClient {
    host: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client for `host` (e.g. "http://localhost:11434").
    ///
    /// The underlying HTTP client carries the request timeout, so a wedged
    /// or unloaded model fails the run with [`ExtractError::ApiTimeout`]
    /// instead of blocking it indefinitely.
    pub fn new(
        host: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, ExtractError> {
        let host = host.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractError::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            host,
            model: model.into(),
            temperature,
            timeout_secs,
            client,
        })
    }

    /// Build a client from the run configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        Self::new(
            config.ollama_host.clone(),
            config.model.clone(),
            config.temperature,
            config.api_timeout_secs,
        )
    }

    /// Check whether the server is reachable at all.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.host);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// The `/api/chat` request body: one user-role message, no streaming.
    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "stream": false,
            "options": {
                "temperature": self.temperature
            }
        })
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    fn id(&self) -> String {
        format!("ollama/{}", self.model)
    }

    async fn chat(&self, prompt: &str) -> Result<ModelReply, ExtractError> {
        let url = format!("{}/api/chat", self.host);
        debug!(
            "POST {} (model={}, prompt={} bytes)",
            url,
            self.model,
            prompt.len()
        );

        let resp = self
            .client
            .post(&url)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::ApiTimeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    ExtractError::ModelUnavailable {
                        host: self.host.clone(),
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ExtractError::LlmApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = resp.json().await.map_err(|e| ExtractError::LlmApiError {
            status: status.as_u16(),
            message: format!("Malformed chat response: {}", e),
        })?;

        parse_chat_response(&body)
    }
}

/// Pull the assistant content and token counts out of a chat response.
fn parse_chat_response(body: &Value) -> Result<ModelReply, ExtractError> {
    let content = body["message"]["content"]
        .as_str()
        .ok_or_else(|| ExtractError::LlmApiError {
            status: 200,
            message: "Chat response has no message.content field".to_string(),
        })?
        .to_string();

    Ok(ModelReply {
        content,
        input_tokens: body["prompt_eval_count"].as_u64().unwrap_or(0) as u32,
        output_tokens: body["eval_count"].as_u64().unwrap_or(0) as u32,
    })
}
