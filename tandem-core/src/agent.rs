//! Conversational agents and their role definitions

use std::sync::Arc;

use crate::error::Result;
use crate::llm::{ChatBackend, ChatRequest, Message};

/// The finite set of agent roles the core knows about.
///
/// Roles are a closed enum rather than free-form strings so adding a new
/// dialogue stage forces every match site to account for it. Each team owns
/// its own agent instances; the role only fixes the name and system framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    // Research team
    CodeAnalyzer,
    SolutionResearcher,
    TestStrategist,
    // Debug team
    ErrorAnalyzer,
    FixProposer,
    TestValidator,
    // Top-level assistant workflow
    Assistant,
}

impl Role {
    /// Stable role name, used in logs and dialogue records.
    pub fn name(&self) -> &'static str {
        match self {
            Role::CodeAnalyzer => "code_analyzer",
            Role::SolutionResearcher => "solution_researcher",
            Role::TestStrategist => "test_strategist",
            Role::ErrorAnalyzer => "error_analyzer",
            Role::FixProposer => "fix_proposer",
            Role::TestValidator => "test_validator",
            Role::Assistant => "assistant",
        }
    }

    /// System prompt that frames every dialogue with this role.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Role::CodeAnalyzer => {
                "You analyze code structure, patterns, and potential improvements. \
                 Focus on code quality and best practices."
            }
            Role::SolutionResearcher => {
                "You research and propose optimal solutions for coding problems. \
                 Consider performance, scalability, and maintainability."
            }
            Role::TestStrategist => {
                "You design comprehensive test strategies. \
                 Focus on test coverage, edge cases, and isolation principles."
            }
            Role::ErrorAnalyzer => {
                "You analyze error messages, stack traces, and code context \
                 to identify root causes of issues."
            }
            Role::FixProposer => {
                "You propose specific code fixes based on error analysis. \
                 Focus on robust, maintainable solutions."
            }
            Role::TestValidator => {
                "You validate proposed fixes through targeted testing. \
                 Ensure fixes don't introduce new issues."
            }
            Role::Assistant => {
                "You create code robustly and send fully finished MVPs based on \
                 the prompt. Reply with TERMINATE when finished."
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single role backed by a chat model.
///
/// An agent holds no conversational state of its own; the coordinator owns
/// the transcript and hands the full history to `respond` on every turn, so
/// the same agent can serve concurrent dialogues.
pub struct ConversationalAgent {
    role: Role,
    backend: Arc<dyn ChatBackend>,
    temperature: f32,
}

impl ConversationalAgent {
    /// Create an agent for a role over a shared backend.
    pub fn new(role: Role, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            role,
            backend,
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// The agent's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Produce one reply to the given transcript.
    ///
    /// The role's system prompt is prepended as conversation framing; the
    /// transcript itself carries only user and assistant turns.
    ///
    /// # Errors
    ///
    /// Propagates backend failures unchanged.
    pub async fn respond(&self, transcript: &[Message]) -> Result<String> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(Message::system(self.role.system_prompt()));
        messages.extend_from_slice(transcript);

        let request = ChatRequest {
            messages,
            temperature: Some(self.temperature),
            max_tokens: None,
        };

        let response = self.backend.complete(&request).await?;
        Ok(response.content)
    }
}
