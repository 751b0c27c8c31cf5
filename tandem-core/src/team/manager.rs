//! Cross-team workflow composition

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{BackendConfig, TandemConfig};
use crate::error::Result;
use crate::llm::{ChatBackend, factory};
use crate::outcome::{BranchOutcome, WorkflowResult};
use crate::team::debug::{DebugTeam, ErrorInfo, FixInfo};
use crate::team::research::ResearchTeam;

/// Original-issue text used when validating a test plan, where no concrete
/// defect exists.
const TEST_COVERAGE_ISSUE: &str = "Test coverage improvement";

/// Owns one research team and one debug team and composes their operations
/// into cross-team workflows.
///
/// A manager is an explicit long-lived context object: construct it once per
/// configuration and pass it to callers, so tests can build managers over
/// stub backends per instance.
pub struct TeamManager {
    research_team: ResearchTeam,
    debug_team: DebugTeam,
}

impl TeamManager {
    /// Create a manager from an ordered, non-empty backend configuration
    /// list. The first backend drives both teams.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the list is empty or malformed.
    pub fn new(backends: Vec<BackendConfig>) -> Result<Self> {
        let config = TandemConfig::new(backends)?;
        Self::from_config(&config)
    }

    /// Create a manager from a full configuration.
    pub fn from_config(config: &TandemConfig) -> Result<Self> {
        config.validate()?;
        let backend = factory::backend_from_config(config)?;
        Ok(Self::with_backend(backend).with_max_turns(config.max_turns))
    }

    /// Create a manager over an existing backend. This is the injection
    /// point for stub backends in tests.
    pub fn with_backend(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            research_team: ResearchTeam::new(backend.clone()),
            debug_team: DebugTeam::new(backend),
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.research_team = self.research_team.with_max_turns(max_turns);
        self.debug_team = self.debug_team.with_max_turns(max_turns);
        self
    }

    /// The manager's research team.
    pub fn research_team(&self) -> &ResearchTeam {
        &self.research_team
    }

    /// The manager's debug team.
    pub fn debug_team(&self) -> &DebugTeam {
        &self.debug_team
    }

    /// Run codebase analysis, optionally alongside a debug-team pass over a
    /// real error.
    ///
    /// When `error_info` is `Some`, both teams run concurrently and the
    /// result carries a "research" and a "debug" entry, each a
    /// result-or-error: one branch failing never drops the other branch's
    /// outcome. When `error_info` is `None` the debug branch is skipped
    /// entirely, since analyzing a fabricated error produces noise rather
    /// than signal.
    pub async fn analyze_and_improve(
        &self,
        path: &Path,
        error_info: Option<&ErrorInfo>,
    ) -> WorkflowResult {
        let mut results = WorkflowResult::new();

        match error_info {
            Some(error_info) => {
                info!(path = %path.display(), "running research and debug teams concurrently");
                let (research, debug) = tokio::join!(
                    self.research_team.analyze_codebase(path),
                    self.debug_team.analyze_error(error_info),
                );

                if let Err(ref e) = research {
                    warn!(error = %e, "research branch failed");
                }
                if let Err(ref e) = debug {
                    warn!(error = %e, "debug branch failed");
                }

                results.insert("research", BranchOutcome::from(research));
                results.insert("debug", BranchOutcome::from(debug));
            }
            None => {
                info!(path = %path.display(), "no error context supplied; skipping debug branch");
                let research = self.research_team.analyze_codebase(path).await;
                results.insert("research", BranchOutcome::from(research));
            }
        }

        results
    }

    /// Research solutions for a problem, then have the debug team validate
    /// the leading approach.
    ///
    /// Sequential pipeline: the research result's "solution_approaches" text
    /// becomes the fix under validation. A research failure aborts the
    /// pipeline before validation starts.
    ///
    /// # Errors
    ///
    /// Propagates the first failing team operation.
    pub async fn solve_problem(&self, problem_description: &str) -> Result<WorkflowResult> {
        let mut results = WorkflowResult::new();

        let research = self.research_team.research_solution(problem_description).await?;

        let fix_info = FixInfo {
            original_issue: problem_description.to_string(),
            fix: research
                .get("solution_approaches")
                .unwrap_or_default()
                .to_string(),
            test_cases: Vec::new(),
        };
        results.insert("research", BranchOutcome::Completed(research));

        let validation = self.debug_team.validate_fix(&fix_info).await?;
        results.insert("validation", BranchOutcome::Completed(validation));

        Ok(results)
    }

    /// Design a test plan for a feature, then have the debug team validate
    /// it.
    ///
    /// # Errors
    ///
    /// Propagates the first failing team operation.
    pub async fn improve_test_coverage(
        &self,
        feature_description: &str,
    ) -> Result<WorkflowResult> {
        let mut results = WorkflowResult::new();

        let test_plan = self.research_team.design_test_plan(feature_description).await?;

        let fix_info = FixInfo {
            original_issue: TEST_COVERAGE_ISSUE.to_string(),
            fix: serde_json::to_string(&test_plan)?,
            test_cases: Vec::new(),
        };
        results.insert("test_plan", BranchOutcome::Completed(test_plan));

        let validation = self.debug_team.validate_fix(&fix_info).await?;
        results.insert("validation", BranchOutcome::Completed(validation));

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatRequest, ChatResponse, MessageRole, StaticBackend};
    use async_trait::async_trait;

    /// Backend that fails any call whose opening prompt contains a marker.
    struct FailOnMarker {
        marker: &'static str,
    }

    #[async_trait]
    impl ChatBackend for FailOnMarker {
        async fn complete(&self, request: &ChatRequest) -> crate::error::Result<ChatResponse> {
            let prompt = request
                .messages
                .iter()
                .find(|m| m.role == MessageRole::User)
                .map(|m| m.content.as_str())
                .unwrap_or_default();

            if prompt.contains(self.marker) {
                return Err(crate::error::TandemError::Backend(
                    "marker hit".to_string(),
                ));
            }

            Ok(ChatResponse {
                content: "OK TERMINATE".to_string(),
                usage: None,
            })
        }
    }

    fn manager() -> TeamManager {
        TeamManager::with_backend(Arc::new(StaticBackend::new("OK TERMINATE")))
    }

    #[test]
    fn test_empty_config_list_rejected() {
        assert!(TeamManager::new(Vec::new()).is_err());
    }

    #[test]
    fn test_manager_from_config_list() {
        let backends = vec![
            BackendConfig::new("m", "http://x").with_api_key("k"),
        ];
        assert!(TeamManager::new(backends).is_ok());
    }

    #[tokio::test]
    async fn test_analyze_and_improve_runs_both_branches() {
        let manager = manager();
        let error_info = ErrorInfo::new("NullPointerException");

        let results = manager
            .analyze_and_improve(Path::new("src"), Some(&error_info))
            .await;

        assert_eq!(results.len(), 2);
        assert!(results.get("research").unwrap().is_completed());
        assert!(results.get("debug").unwrap().is_completed());
    }

    #[tokio::test]
    async fn test_analyze_and_improve_skips_debug_without_error() {
        let manager = manager();
        let results = manager.analyze_and_improve(Path::new("src"), None).await;

        assert_eq!(results.len(), 1);
        assert!(results.contains("research"));
        assert!(!results.contains("debug"));
    }

    #[tokio::test]
    async fn test_failed_debug_branch_does_not_mask_research() {
        // Debug-team openings all mention the error message; research
        // openings do not, so only the debug branch fails.
        let manager = TeamManager::with_backend(Arc::new(FailOnMarker {
            marker: "identify root cause",
        }));
        let error_info = ErrorInfo::new("boom");

        let results = manager
            .analyze_and_improve(Path::new("src"), Some(&error_info))
            .await;

        assert!(results.get("research").unwrap().is_completed());
        let debug = results.get("debug").unwrap();
        assert!(!debug.is_completed());
        assert!(debug.error().unwrap().to_string().contains("marker hit"));
    }

    #[tokio::test]
    async fn test_solve_problem_pipes_research_into_validation() {
        let manager = manager();
        let results = manager.solve_problem("flaky cache").await.unwrap();

        assert!(results.get("research").unwrap().is_completed());
        assert!(results.get("validation").unwrap().is_completed());
    }

    #[tokio::test]
    async fn test_solve_problem_aborts_on_research_failure() {
        let manager = TeamManager::with_backend(Arc::new(FailOnMarker {
            marker: "Research solution approaches",
        }));

        let error = manager.solve_problem("anything").await.unwrap_err();
        assert_eq!(error.aborted_stage(), Some("solution_approaches"));
    }

    #[tokio::test]
    async fn test_improve_test_coverage_pipeline() {
        let manager = manager();
        let results = manager.improve_test_coverage("login flow").await.unwrap();

        let plan = results.get("test_plan").unwrap().result().unwrap();
        assert_eq!(plan.get("test_plan"), Some("OK TERMINATE"));
        assert!(results.get("validation").unwrap().is_completed());
    }
}
