//! # Tandem - Role-Specialized Agent Teams for Code Improvement
//!
//! Tandem coordinates small teams of role-specialized conversational agents
//! to jointly analyze and improve a codebase:
//! - A **research team** (code analysis, solution research, test strategy)
//! - A **debug team** (error analysis, fix proposal, fix validation)
//! - A **team manager** composing both into cross-team workflows
//!
//! Each team runs structured multi-turn dialogues through a non-generative
//! coordinator that supplies the task, relays replies, and detects the
//! termination marker. Within an operation, dialogues run sequentially and a
//! stage's result can feed the next stage's prompt; the manager's
//! `analyze_and_improve` is the only place two chains run concurrently.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tandem_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let manager = TeamManager::new(vec![
//!         BackendConfig::new("llama3.1:8b", "http://localhost:11434/v1"),
//!     ])?;
//!
//!     let plan = manager.improve_test_coverage("session handling").await?;
//!     println!("{}", serde_json::to_string_pretty(&plan)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The core consumes, but does not own, two external collaborators:
//! - a [`llm::ChatBackend`] reachable at a configurable endpoint
//! - a [`exec::CodeExecutor`] sandbox, used only by the assistant workflow
//!
//! Backend failures are fatal to the operation that issued them; a dialogue
//! that exhausts its turn bound without the termination marker is not an
//! error and returns its last reply.

pub mod agent;
pub mod assistant;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod exec;
pub mod llm;
pub mod outcome;
pub mod parsing;
pub mod team;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agent::{ConversationalAgent, Role};
    pub use crate::assistant::AssistantWorkflow;
    pub use crate::config::{BackendConfig, TandemConfig};
    pub use crate::coordinator::{Coordinator, Dialogue, is_termination_message};
    pub use crate::error::{Result, TandemError};
    pub use crate::exec::{CodeExecutor, ExecutionOutcome, ExecutionStatus, Language};
    pub use crate::llm::{
        ChatBackend, ChatRequest, ChatResponse, Message, MessageRole, ModelInfo, StaticBackend,
        TokenUsage,
    };
    pub use crate::outcome::{BranchOutcome, ChainedResult, WorkflowResult};
    pub use crate::parsing::{CodeBlock, extract_code_blocks};
    pub use crate::team::{DebugTeam, ErrorInfo, FixInfo, ResearchTeam, TeamManager};
}
