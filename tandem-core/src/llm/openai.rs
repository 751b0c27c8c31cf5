//! OpenAI-compatible chat backend
//!
//! Speaks the `/chat/completions` wire format, which covers OpenAI itself as
//! well as local servers (Ollama, vLLM) that expose the same endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::error::{Result, TandemError};
use crate::llm::{ChatBackend, ChatRequest, ChatResponse, MessageRole, ModelInfo, TokenUsage};

/// Chat backend for OpenAI-compatible endpoints.
pub struct OpenAiCompatBackend {
    client: reqwest::Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
    temperature: f32,
}

impl OpenAiCompatBackend {
    /// Create a backend from a [`BackendConfig`].
    ///
    /// The config's timeout is applied to every request; a timed-out call
    /// fails with a backend error and is not retried.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TandemError::Backend(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        })
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Deserialize)]
struct WireChoiceMessage {
    #[allow(dead_code)]
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

#[async_trait]
impl ChatBackend for OpenAiCompatBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let messages: Vec<WireMessage> = request
            .messages
            .iter()
            .map(|m| WireMessage {
                role: match m.role {
                    MessageRole::System => "system".to_string(),
                    MessageRole::User => "user".to_string(),
                    MessageRole::Assistant => "assistant".to_string(),
                },
                content: m.content.clone(),
            })
            .collect();

        let wire_request = WireRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature.unwrap_or(self.temperature),
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let mut builder = self.client.post(&url).json(&wire_request);
        if let Some(ref api_key) = self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            TandemError::Backend(format!("Failed to send request to {}: {}", url, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TandemError::Backend(format!(
                "Chat API error ({}): {}",
                status, text
            )));
        }

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| TandemError::Backend(format!("Failed to parse chat response: {}", e)))?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TandemError::Backend("Chat response contained no choices".to_string()))?;

        let usage = wire_response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatResponse {
            content: choice.message.content.trim().to_string(),
            usage,
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "openai-compat".to_string(),
            model_name: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_config() {
        let config = BackendConfig::new("llama3.1:8b", "http://localhost:11434/v1/");
        let backend = OpenAiCompatBackend::from_config(&config).unwrap();

        assert_eq!(backend.model(), "llama3.1:8b");
        // Trailing slash is normalized so URL joining stays clean.
        assert_eq!(backend.base_url(), "http://localhost:11434/v1");
    }

    #[test]
    fn test_model_info() {
        let config = BackendConfig::new("m", "http://x");
        let backend = OpenAiCompatBackend::from_config(&config).unwrap();
        let info = backend.model_info();
        assert_eq!(info.provider, "openai-compat");
        assert_eq!(info.model_name, "m");
    }
}
