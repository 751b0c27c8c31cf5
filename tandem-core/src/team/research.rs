//! Research team: code analysis, solution research, test strategy

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::agent::{ConversationalAgent, Role};
use crate::coordinator::Coordinator;
use crate::error::{Result, TandemError};
use crate::llm::ChatBackend;
use crate::outcome::ChainedResult;

/// Fixed roster of three research roles driven by one coordinator.
///
/// The team owns its agent instances; other teams built over the same
/// backend still get their own roles.
pub struct ResearchTeam {
    code_analyzer: ConversationalAgent,
    solution_researcher: ConversationalAgent,
    test_strategist: ConversationalAgent,
    coordinator: Coordinator,
}

impl ResearchTeam {
    /// Create the team over a shared chat backend.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            code_analyzer: ConversationalAgent::new(Role::CodeAnalyzer, backend.clone()),
            solution_researcher: ConversationalAgent::new(Role::SolutionResearcher, backend.clone()),
            test_strategist: ConversationalAgent::new(Role::TestStrategist, backend),
            coordinator: Coordinator::new("research_coordinator"),
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.coordinator = self.coordinator.with_max_turns(max_turns);
        self
    }

    /// Run one stage, tagging any failure with the stage name so callers can
    /// tell where a chain broke.
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

    /// Analyze a codebase's structure and propose improvements.
    ///
    /// Three sequential dialogues: analysis, solution research, and test
    /// strategy. Each stage's prompt references the path only; stages are
    /// ordered but not chained.
    ///
    /// # Errors
    ///
    /// A failing stage aborts the operation; no partial result is returned.
    pub async fn analyze_codebase(&self, path: &Path) -> Result<ChainedResult> {
        info!(path = %path.display(), "research team: analyzing codebase");
        let mut results = ChainedResult::new();

        let analysis = self
            .run_stage(
                "code_analysis",
                &self.code_analyzer,
                &format!("Analyze code structure and patterns in: {}", path.display()),
            )
            .await?;
        results.insert("code_analysis", analysis);

        let research = self
            .run_stage(
                "solution_research",
                &self.solution_researcher,
                &format!(
                    "Research optimal solutions and improvements for: {}",
                    path.display()
                ),
            )
            .await?;
        results.insert("solution_research", research);

        let strategy = self
            .run_stage(
                "test_strategy",
                &self.test_strategist,
                &format!("Design test strategy for codebase: {}", path.display()),
            )
            .await?;
        results.insert("test_strategy", strategy);

        Ok(results)
    }

    /// Research solution approaches for a specific coding problem, then an
    /// implementation strategy for it.
    pub async fn research_solution(&self, problem_description: &str) -> Result<ChainedResult> {
        info!("research team: researching solution");
        let mut results = ChainedResult::new();

        let approaches = self
            .run_stage(
                "solution_approaches",
                &self.solution_researcher,
                &format!("Research solution approaches for: {}", problem_description),
            )
            .await?;
        results.insert("solution_approaches", approaches);

        let strategy = self
            .run_stage(
                "implementation_strategy",
                &self.code_analyzer,
                &format!(
                    "Analyze implementation strategy for: {}",
                    problem_description
                ),
            )
            .await?;
        results.insert("implementation_strategy", strategy);

        Ok(results)
    }

    /// Design a complete test plan for a feature. Single dialogue.
    pub async fn design_test_plan(&self, feature_description: &str) -> Result<ChainedResult> {
        info!("research team: designing test plan");
        let mut results = ChainedResult::new();

        let plan = self
            .run_stage(
                "test_plan",
                &self.test_strategist,
                &format!("Design complete test plan for: {}", feature_description),
            )
            .await?;
        results.insert("test_plan", plan);

        Ok(results)
    }
}
