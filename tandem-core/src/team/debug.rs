//! Debug team: error analysis, fix proposal, fix validation

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agent::{ConversationalAgent, Role};
use crate::coordinator::Coordinator;
use crate::error::{Result, TandemError};
use crate::llm::ChatBackend;
use crate::outcome::ChainedResult;

/// Error context handed to the debug team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(default)]
    pub traceback: String,
    #[serde(default)]
    pub context: String,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            traceback: String::new(),
            context: String::new(),
        }
    }

    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = traceback.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

/// A proposed fix to be validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixInfo {
    pub original_issue: String,
    pub fix: String,
    #[serde(default)]
    pub test_cases: Vec<String>,
}

/// Fixed roster of three debugging roles driven by one coordinator.
pub struct DebugTeam {
    error_analyzer: ConversationalAgent,
    fix_proposer: ConversationalAgent,
    test_validator: ConversationalAgent,
    coordinator: Coordinator,
}

impl DebugTeam {
    /// Create the team over a shared chat backend.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            error_analyzer: ConversationalAgent::new(Role::ErrorAnalyzer, backend.clone()),
            fix_proposer: ConversationalAgent::new(Role::FixProposer, backend.clone()),
            test_validator: ConversationalAgent::new(Role::TestValidator, backend),
            coordinator: Coordinator::new("debug_coordinator"),
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.coordinator = self.coordinator.with_max_turns(max_turns);
        self
    }

    async fn run_stage(
        &self,
        stage: &str,
        agent: &ConversationalAgent,
        opening_message: &str,
    ) -> Result<String> {
        self.coordinator
            .run_dialogue(agent, opening_message)
            .await
            .map_err(|e| TandemError::chain_abort(stage, e))
    }

    /// Analyze an error and chain through fix proposal and validation
    /// planning.
    ///
    /// This is a true chain: the fix proposal prompt is built from the error
    /// analysis terminal message, and the validation prompt from the fix
    /// proposal. Downstream stages never see `error_info` directly.
    ///
    /// # Errors
    ///
    /// A failing stage aborts the chain; the error names the failed stage
    /// and no partial result is returned.
    pub async fn analyze_error(&self, error_info: &ErrorInfo) -> Result<ChainedResult> {
        info!("debug team: analyzing error");
        let mut results = ChainedResult::new();

        let error_context = format!(
            "Error Message: {}\nStack Trace: {}\nCode Context: {}",
            error_info.message, error_info.traceback, error_info.context
        );

        let analysis = self
            .run_stage(
                "error_analysis",
                &self.error_analyzer,
                &format!("Analyze error and identify root cause:\n{}", error_context),
            )
            .await?;
        results.insert("error_analysis", analysis.clone());

        let proposal = self
            .run_stage(
                "fix_proposal",
                &self.fix_proposer,
                &format!("Propose specific code fixes based on analysis:\n{}", analysis),
            )
            .await?;
        results.insert("fix_proposal", proposal.clone());

        let validation = self
            .run_stage(
                "validation_plan",
                &self.test_validator,
                &format!("Design validation tests for proposed fix:\n{}", proposal),
            )
            .await?;
        results.insert("validation_plan", validation);

        Ok(results)
    }

    /// Validate a proposed fix. Single dialogue.
    pub async fn validate_fix(&self, fix_info: &FixInfo) -> Result<ChainedResult> {
        info!("debug team: validating fix");
        let mut results = ChainedResult::new();

        let validation_context = format!(
            "Original Issue: {}\nProposed Fix: {}\nTest Cases: {}",
            fix_info.original_issue,
            fix_info.fix,
            fix_info.test_cases.join(", ")
        );

        let validation = self
            .run_stage(
                "validation_result",
                &self.test_validator,
                &format!("Validate fix implementation:\n{}", validation_context),
            )
            .await?;
        results.insert("validation_result", validation);

        Ok(results)
    }

    /// Debug a specific code section: analysis, then a fix built from the
    /// analysis output only.
    pub async fn debug_code_section(
        &self,
        code: &str,
        error_message: &str,
    ) -> Result<ChainedResult> {
        info!("debug team: debugging code section");
        let mut results = ChainedResult::new();

        let analysis = self
            .run_stage(
                "analysis",
                &self.error_analyzer,
                &format!(
                    "Analyze code section and error:\nCode:\n{}\nError:\n{}",
                    code, error_message
                ),
            )
            .await?;
        results.insert("analysis", analysis.clone());

        let fix = self
            .run_stage(
                "fix",
                &self.fix_proposer,
                &format!("Propose fix based on analysis:\n{}", analysis),
            )
            .await?;
        results.insert("fix", fix);

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatBackend, ChatRequest, ChatResponse, MessageRole};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend that records every opening prompt and replies per call index.
    /// A `None` entry makes that call fail with a backend error.
    struct RecordingBackend {
        replies: Vec<Option<String>>,
        prompts: Mutex<Vec<String>>,
        calls: Mutex<usize>,
    }

    impl RecordingBackend {
        fn new(replies: Vec<Option<String>>) -> Self {
            Self {
                replies,
                prompts: Mutex::new(Vec::new()),
                calls: Mutex::new(0),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for RecordingBackend {
        async fn complete(&self, request: &ChatRequest) -> crate::error::Result<ChatResponse> {
            let opening = request
                .messages
                .iter()
                .find(|m| m.role == MessageRole::User)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            self.prompts.lock().unwrap().push(opening);

            let mut calls = self.calls.lock().unwrap();
            let index = *calls;
            *calls += 1;

            match self.replies.get(index) {
                Some(Some(content)) => Ok(ChatResponse {
                    content: content.clone(),
                    usage: None,
                }),
                Some(None) => Err(crate::error::TandemError::Backend(
                    "stub backend failure".to_string(),
                )),
                None => Ok(ChatResponse {
                    content: "OK TERMINATE".to_string(),
                    usage: None,
                }),
            }
        }
    }

    fn sample_error() -> ErrorInfo {
        ErrorInfo::new("IndexError: list index out of range")
            .with_traceback("File \"app.py\", line 12")
            .with_context("items[len(items)]")
    }

    #[tokio::test]
    async fn test_analyze_error_chains_stage_outputs() {
        let backend = Arc::new(RecordingBackend::new(vec![
            Some("ROOT-CAUSE-7 TERMINATE".to_string()),
            Some("PATCH-12 TERMINATE".to_string()),
            Some("PLAN-3 TERMINATE".to_string()),
        ]));
        let team = DebugTeam::new(backend.clone());

        let results = team.analyze_error(&sample_error()).await.unwrap();

        assert_eq!(results.get("error_analysis"), Some("ROOT-CAUSE-7 TERMINATE"));
        assert_eq!(results.get("fix_proposal"), Some("PATCH-12 TERMINATE"));
        assert_eq!(results.get("validation_plan"), Some("PLAN-3 TERMINATE"));

        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 3);
        // Stage 2 sees stage 1's terminal message, not the raw error.
        assert!(prompts[1].contains("ROOT-CAUSE-7 TERMINATE"));
        assert!(!prompts[1].contains("IndexError"));
        // Stage 3 sees stage 2's terminal message only.
        assert!(prompts[2].contains("PATCH-12 TERMINATE"));
        assert!(!prompts[2].contains("IndexError"));
        assert!(!prompts[2].contains("ROOT-CAUSE-7"));
    }

    #[tokio::test]
    async fn test_analyze_error_fails_fast_at_second_stage() {
        let backend = Arc::new(RecordingBackend::new(vec![
            Some("analysis TERMINATE".to_string()),
            None,
        ]));
        let team = DebugTeam::new(backend);

        let error = team.analyze_error(&sample_error()).await.unwrap_err();
        assert_eq!(error.aborted_stage(), Some("fix_proposal"));
        // Fail-fast: the error carries no partial chained result, and the
        // message does not leak upstream stage output.
        assert!(!error.to_string().contains("analysis TERMINATE"));
    }

    #[tokio::test]
    async fn test_validate_fix_single_stage() {
        let team = DebugTeam::new(Arc::new(RecordingBackend::new(vec![])));
        let fix = FixInfo {
            original_issue: "crash on empty input".to_string(),
            fix: "guard clause".to_string(),
            test_cases: vec!["empty".to_string(), "single".to_string()],
        };

        let results = team.validate_fix(&fix).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.get("validation_result"), Some("OK TERMINATE"));
    }

    #[tokio::test]
    async fn test_debug_code_section_chains_analysis_into_fix() {
        let backend = Arc::new(RecordingBackend::new(vec![
            Some("off-by-one TERMINATE".to_string()),
            Some("use len-1 TERMINATE".to_string()),
        ]));
        let team = DebugTeam::new(backend.clone());

        let results = team
            .debug_code_section("items[len(items)]", "IndexError")
            .await
            .unwrap();

        assert_eq!(results.get("analysis"), Some("off-by-one TERMINATE"));
        assert_eq!(results.get("fix"), Some("use len-1 TERMINATE"));

        let prompts = backend.prompts();
        assert!(prompts[1].contains("off-by-one TERMINATE"));
        assert!(!prompts[1].contains("items[len(items)]"));
    }
}
