//! Result maps produced by team and manager operations

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::TandemError;

/// Insertion-ordered mapping from stage name to a dialogue's terminal
/// message.
///
/// Built incrementally as a chain runs; stage order is the execution order,
/// which serialization preserves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainedResult {
    stages: Vec<(String, String)>,
}

impl ChainedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stage's terminal message. Re-inserting a stage name replaces
    /// its value without changing its position.
    pub fn insert(&mut self, stage: impl Into<String>, terminal_message: impl Into<String>) {
        let stage = stage.into();
        let terminal_message = terminal_message.into();

        if let Some(entry) = self.stages.iter_mut().find(|(name, _)| *name == stage) {
            entry.1 = terminal_message;
        } else {
            self.stages.push((stage, terminal_message));
        }
    }

    pub fn get(&self, stage: &str) -> Option<&str> {
        self.stages
            .iter()
            .find(|(name, _)| name == stage)
            .map(|(_, value)| value.as_str())
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stages
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Serialize for ChainedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.stages.len()))?;
        for (name, value) in &self.stages {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ChainedResult {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = ChainedResult::new();
        for (name, value) in iter {
            result.insert(name, value);
        }
        result
    }
}

/// Outcome of one branch of a workflow.
///
/// Concurrent fan-out reports a result-or-error per branch so one branch's
/// failure never masks the other's outcome.
#[derive(Debug)]
pub enum BranchOutcome {
    Completed(ChainedResult),
    Failed(TandemError),
}

impl BranchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, BranchOutcome::Completed(_))
    }

    pub fn result(&self) -> Option<&ChainedResult> {
        match self {
            BranchOutcome::Completed(result) => Some(result),
            BranchOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&TandemError> {
        match self {
            BranchOutcome::Completed(_) => None,
            BranchOutcome::Failed(error) => Some(error),
        }
    }
}

impl From<crate::error::Result<ChainedResult>> for BranchOutcome {
    fn from(result: crate::error::Result<ChainedResult>) -> Self {
        match result {
            Ok(chained) => BranchOutcome::Completed(chained),
            Err(error) => BranchOutcome::Failed(error),
        }
    }
}

impl Serialize for BranchOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BranchOutcome::Completed(result) => result.serialize(serializer),
            BranchOutcome::Failed(error) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &error.to_string())?;
                map.end()
            }
        }
    }
}

/// Insertion-ordered mapping from team or stage name to a branch outcome.
///
/// Assembled by the team manager, returned to the caller, and not retained.
#[derive(Debug, Default)]
pub struct WorkflowResult {
    entries: Vec<(String, BranchOutcome)>,
}

impl WorkflowResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, outcome: BranchOutcome) {
        self.entries.push((name.into(), outcome));
    }

    pub fn get(&self, name: &str) -> Option<&BranchOutcome> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, outcome)| outcome)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BranchOutcome)> {
        self.entries
            .iter()
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for WorkflowResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, outcome) in &self.entries {
            map.serialize_entry(name, outcome)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_result_preserves_insertion_order() {
        let mut result = ChainedResult::new();
        result.insert("error_analysis", "root cause");
        result.insert("fix_proposal", "patch");
        result.insert("validation_plan", "tests");

        let names: Vec<&str> = result.stage_names().collect();
        assert_eq!(names, vec!["error_analysis", "fix_proposal", "validation_plan"]);
    }

    #[test]
    fn test_chained_result_reinsert_replaces_in_place() {
        let mut result = ChainedResult::new();
        result.insert("a", "1");
        result.insert("b", "2");
        result.insert("a", "3");

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("a"), Some("3"));
        assert_eq!(result.stage_names().next(), Some("a"));
    }

    #[test]
    fn test_chained_result_serializes_as_ordered_map() {
        let result: ChainedResult = [("first", "1"), ("second", "2")].into_iter().collect();
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"first":"1","second":"2"}"#);
    }

    #[test]
    fn test_failed_branch_serializes_error() {
        let outcome = BranchOutcome::Failed(TandemError::Backend("boom".to_string()));
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"error":"Backend error: boom"}"#);
    }

    #[test]
    fn test_workflow_result_lookup() {
        let mut result = WorkflowResult::new();
        result.insert("research", BranchOutcome::Completed(ChainedResult::new()));
        result.insert(
            "debug",
            BranchOutcome::Failed(TandemError::Backend("down".to_string())),
        );

        assert!(result.contains("research"));
        assert!(result.get("research").unwrap().is_completed());
        assert!(!result.get("debug").unwrap().is_completed());
        assert!(result.get("missing").is_none());
    }
}
