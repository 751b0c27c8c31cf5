//! Dialogue coordination
//!
//! The coordinator is the non-generative side of every dialogue: it supplies
//! the task message, relays agent replies, and decides when the exchange is
//! over. It never calls a model itself.

use tracing::{debug, warn};

use crate::agent::{ConversationalAgent, Role};
use crate::error::Result;
use crate::llm::{Message, MessageRole};

/// Marker an agent includes in its reply to end the dialogue.
pub const TERMINATION_MARKER: &str = "TERMINATE";

/// Prompt the coordinator sends when a reply arrives without the marker and
/// turns remain.
const CONTINUATION_PROMPT: &str = "Continue. Reply with TERMINATE when you are finished.";

/// Whether a reply signals the end of a dialogue.
///
/// The contract is a case-insensitive substring match. Alternative
/// termination signals can be swapped in here without touching the dialogue
/// loop or any chaining logic.
pub fn is_termination_message(text: &str) -> bool {
    text.to_uppercase().contains(TERMINATION_MARKER)
}

/// Record of one coordinator-initiated exchange with a single agent.
///
/// Created per invocation and discarded once the terminal message has been
/// extracted; dialogues are not persisted or resumable.
#[derive(Debug, Clone)]
pub struct Dialogue {
    /// Role of the participating agent
    pub role: Role,
    /// Ordered turns, coordinator messages as `User`, agent replies as
    /// `Assistant`
    pub transcript: Vec<Message>,
    /// Whether the agent produced the termination marker before the turn
    /// limit was reached
    pub terminated: bool,
}

impl Dialogue {
    /// The last agent reply, which the teams treat as the dialogue's result.
    pub fn terminal_message(&self) -> &str {
        self.transcript
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    /// Number of agent replies in the transcript.
    pub fn turns(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.role == MessageRole::Assistant)
            .count()
    }
}

/// Non-generative dialogue driver.
///
/// A coordinator holds only its name and turn bound, so one instance can
/// drive any number of concurrent dialogues against distinct agents.
pub struct Coordinator {
    name: String,
    max_turns: usize,
}

impl Coordinator {
    /// Create a coordinator with the default turn bound.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_turns: 5,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    /// The coordinator's name, used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one dialogue and return its terminal message.
    ///
    /// Sends `opening_message`, reads the reply, and checks the termination
    /// predicate. A non-terminating reply is answered with a fixed
    /// continuation prompt until the marker appears or `max_turns` replies
    /// have been collected. Exhausting the bound is not an error: the last
    /// reply is returned as-is, since partial progress is still useful.
    ///
    /// # Errors
    ///
    /// Propagates backend failures from the agent.
    pub async fn run_dialogue(
        &self,
        agent: &ConversationalAgent,
        opening_message: &str,
    ) -> Result<String> {
        let dialogue = self.run_dialogue_recorded(agent, opening_message).await?;
        Ok(dialogue.terminal_message().to_string())
    }

    /// Run one dialogue and return the full record.
    pub async fn run_dialogue_recorded(
        &self,
        agent: &ConversationalAgent,
        opening_message: &str,
    ) -> Result<Dialogue> {
        debug!(
            coordinator = %self.name,
            role = %agent.role(),
            "opening dialogue"
        );

        let mut transcript = vec![Message::user(opening_message)];
        let mut terminated = false;

        for turn in 0..self.max_turns {
            let reply = agent.respond(&transcript).await?;
            transcript.push(Message::assistant(reply.clone()));

            if is_termination_message(&reply) {
                debug!(
                    coordinator = %self.name,
                    role = %agent.role(),
                    turns = turn + 1,
                    "dialogue terminated"
                );
                terminated = true;
                break;
            }

            if turn + 1 < self.max_turns {
                transcript.push(Message::user(CONTINUATION_PROMPT));
            }
        }

        if !terminated {
            warn!(
                coordinator = %self.name,
                role = %agent.role(),
                max_turns = self.max_turns,
                "dialogue reached turn limit without termination marker; \
                 returning last reply"
            );
        }

        Ok(Dialogue {
            role: agent.role(),
            transcript,
            terminated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatBackend, ChatRequest, ChatResponse, StaticBackend};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        replies: Vec<String>,
        calls: AtomicUsize,
    }

    impl CountingBackend {
        fn new(replies: Vec<&str>) -> Self {
            Self {
                replies: replies.into_iter().map(String::from).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for CountingBackend {
        async fn complete(&self, _request: &ChatRequest) -> crate::error::Result<ChatResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let content = self
                .replies
                .get(call)
                .cloned()
                .unwrap_or_else(|| "still working".to_string());
            Ok(ChatResponse {
                content,
                usage: None,
            })
        }
    }

    #[test]
    fn test_termination_predicate_is_case_insensitive() {
        assert!(is_termination_message("done TERMINATE"));
        assert!(is_termination_message("done terminate"));
        assert!(is_termination_message("Done. Terminate."));
        assert!(!is_termination_message("not finished yet"));
        assert!(!is_termination_message(""));
    }

    #[tokio::test]
    async fn test_dialogue_ends_after_one_terminating_turn() {
        let backend = Arc::new(CountingBackend::new(vec!["OK TERMINATE"]));
        let agent = ConversationalAgent::new(Role::TestStrategist, backend.clone());
        let coordinator = Coordinator::new("research_coordinator");

        let dialogue = coordinator
            .run_dialogue_recorded(&agent, "Design tests")
            .await
            .unwrap();

        assert!(dialogue.terminated);
        assert_eq!(dialogue.turns(), 1);
        assert_eq!(dialogue.terminal_message(), "OK TERMINATE");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_terminating_dialogue_returns_last_reply() {
        let backend = Arc::new(CountingBackend::new(vec!["first", "second", "third"]));
        let agent = ConversationalAgent::new(Role::CodeAnalyzer, backend.clone());
        let coordinator = Coordinator::new("c").with_max_turns(3);

        let dialogue = coordinator
            .run_dialogue_recorded(&agent, "go")
            .await
            .unwrap();

        assert!(!dialogue.terminated);
        assert_eq!(dialogue.turns(), 3);
        assert_eq!(dialogue.terminal_message(), "third");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_reprompt_until_marker() {
        let backend = Arc::new(CountingBackend::new(vec!["working", "done TERMINATE"]));
        let agent = ConversationalAgent::new(Role::FixProposer, backend.clone());
        let coordinator = Coordinator::new("c").with_max_turns(4);

        let terminal = coordinator.run_dialogue(&agent, "fix it").await.unwrap();
        assert_eq!(terminal, "done TERMINATE");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_dialogues_share_one_coordinator() {
        let backend: Arc<dyn ChatBackend> = Arc::new(StaticBackend::new("OK TERMINATE"));
        let coordinator = Arc::new(Coordinator::new("shared"));

        let a = ConversationalAgent::new(Role::CodeAnalyzer, backend.clone());
        let b = ConversationalAgent::new(Role::ErrorAnalyzer, backend.clone());

        let (ra, rb) = tokio::join!(
            coordinator.run_dialogue(&a, "task a"),
            coordinator.run_dialogue(&b, "task b"),
        );

        assert_eq!(ra.unwrap(), "OK TERMINATE");
        assert_eq!(rb.unwrap(), "OK TERMINATE");
    }
}
