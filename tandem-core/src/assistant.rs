//! Top-level assistant workflow
//!
//! A single general-purpose assistant role driven by its own coordinator.
//! Unlike the analysis teams, this workflow may hand generated code to an
//! external [`CodeExecutor`] and append each run's outcome to the returned
//! report.

use std::sync::Arc;

use tracing::{debug, info};

use crate::agent::{ConversationalAgent, Role};
use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::exec::{CodeExecutor, Language};
use crate::llm::ChatBackend;
use crate::parsing::extract_code_blocks;

/// Assistant agent plus optional execution sandbox.
pub struct AssistantWorkflow {
    assistant: ConversationalAgent,
    coordinator: Coordinator,
    executor: Option<Arc<dyn CodeExecutor>>,
}

impl AssistantWorkflow {
    /// Create the workflow over a shared chat backend, without execution.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            assistant: ConversationalAgent::new(Role::Assistant, backend),
            coordinator: Coordinator::new("assistant_coordinator").with_max_turns(10),
            executor: None,
        }
    }

    /// Attach a code-execution sandbox.
    pub fn with_executor(mut self, executor: Arc<dyn CodeExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.coordinator = self.coordinator.with_max_turns(max_turns);
        self
    }

    /// Run one task end to end.
    ///
    /// The assistant's reply is returned as the report. If an executor is
    /// attached, each runnable code block in the reply is executed and its
    /// outcome appended to the report.
    ///
    /// # Errors
    ///
    /// Propagates backend and sandbox failures.
    pub async fn execute_task(&self, task_description: &str) -> Result<String> {
        info!("assistant workflow: executing task");
        let reply = self
            .coordinator
            .run_dialogue(&self.assistant, task_description)
            .await?;

        let Some(ref executor) = self.executor else {
            return Ok(reply);
        };

        let mut report = reply.clone();
        for block in extract_code_blocks(&reply) {
            let Some(language) = Language::from_tag(&block.language) else {
                debug!(tag = %block.language, "skipping code block with unsupported tag");
                continue;
            };

            let outcome = executor.execute(&block.source, language).await?;
            report.push_str("\n\n--- execution ");
            report.push_str(if outcome.is_success() { "completed" } else { "failed" });
            report.push_str(" ---\n");
            report.push_str(&outcome.output);
        }

        Ok(report)
    }

    /// Analyze raw data against a prompt. Single dialogue, no execution.
    pub async fn analyze_data(&self, data: &str, analysis_prompt: &str) -> Result<String> {
        info!("assistant workflow: analyzing data");
        let message = format!(
            "Data content:\n{}\n\nAnalysis prompt:\n{}",
            data, analysis_prompt
        );

        self.coordinator
            .run_dialogue(&self.assistant, &message)
            .await
    }
}
