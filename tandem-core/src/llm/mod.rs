//! LLM backend interface
//!
//! The coordination core consumes a chat-completion backend but does not own
//! one; anything implementing [`ChatBackend`] can drive the teams, including
//! the deterministic [`StaticBackend`] used by tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod factory;
pub mod openai;

pub use factory::backend_for;
pub use openai::OpenAiCompatBackend;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to a chat backend
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Messages in the conversation, system prompt first if present
    pub messages: Vec<Message>,

    /// Sampling temperature (0.0-2.0)
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
}

impl ChatRequest {
    /// Create a simple request from a single prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Create a request with system framing and a user prompt
    pub fn with_system_prompt(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 2.0));
        self
    }
}

/// Response from a chat backend
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated content
    pub content: String,

    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

/// Trait for chat-completion backends.
///
/// Implementors handle the actual LLM call; failures surface as
/// `TandemError::Backend` and are fatal to the operation that issued them.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Produce a completion for the given conversation.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Get model information
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}

/// Deterministic backend that replies with a fixed string.
///
/// Used by tests and CLI dry runs; the same transcript always produces the
/// same reply, which keeps chained results byte-identical across runs.
pub struct StaticBackend {
    reply: String,
}

impl StaticBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for StaticBackend {
    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse> {
        Ok(ChatResponse {
            content: self.reply.clone(),
            usage: None,
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "static".to_string(),
            model_name: "none".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_with_system_prompt() {
        let request = ChatRequest::with_system_prompt("You are helpful", "hello");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
    }

    #[test]
    fn test_temperature_clamping() {
        let request = ChatRequest::from_prompt("x").with_temperature(5.0);
        assert_eq!(request.temperature, Some(2.0));

        let request = ChatRequest::from_prompt("x").with_temperature(-1.0);
        assert_eq!(request.temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_static_backend_is_deterministic() {
        let backend = StaticBackend::new("OK TERMINATE");
        let request = ChatRequest::from_prompt("anything");

        let first = backend.complete(&request).await.unwrap();
        let second = backend.complete(&request).await.unwrap();
        assert_eq!(first.content, second.content);
    }
}
