//! Code-execution boundary
//!
//! The assistant workflow can hand generated code to an external sandbox.
//! The core defines only the interface; the sandbox itself (subprocess,
//! container, remote service) lives outside this crate. The analysis teams
//! never execute code.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Language tag for a code submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
}

impl Language {
    /// Parse a fenced-code-block language tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "python" | "py" => Some(Language::Python),
            "java" => Some(Language::Java),
            _ => None,
        }
    }
}

/// Terminal state of a code execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Completed,
    Error,
}

/// What came back from the sandbox: stdout on success, error text otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: ExecutionStatus,
    pub output: String,
}

impl ExecutionOutcome {
    pub fn completed(output: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Completed,
            output: output.into(),
        }
    }

    pub fn error(output: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }
}

/// External code-execution sandbox.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Run source text and report the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error only when the sandbox itself is unreachable; a
    /// failing program is a `Completed`/`Error` outcome, not an `Err`.
    async fn execute(&self, source: &str, language: Language) -> Result<ExecutionOutcome>;
}
