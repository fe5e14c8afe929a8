//! Task classification
//!
//! Maps request text to the downstream action that handles it. The baseline
//! policy is an ordered keyword rule list behind the [`Classifier`] trait so
//! a learned intent model can replace it without changing the orchestrator's
//! contract.

use crate::error::{OrchestratorError, Result};

/// Which downstream handler takes the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Language-model-backed copilot response
    GeneralCopilot,

    /// Hand-off to the numerical solver backend
    NumericalTask,
}

/// Pure decision function from request text to a task kind.
///
/// Implementations must be deterministic and total for non-empty input:
/// exactly one tag, no side effects, no network calls.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<TaskKind>;
}

/// Baseline rules: case-insensitive substring match, first match wins,
/// `GeneralCopilot` when nothing matches. Kept as data so the policy is
/// inspectable and testable.
const BASELINE_RULES: &[(&str, TaskKind)] = &[
    ("simulation", TaskKind::NumericalTask),
    ("pinn", TaskKind::NumericalTask),
];

/// Keyword-based baseline classifier
pub struct KeywordClassifier {
    rules: Vec<(String, TaskKind)>,
}

impl KeywordClassifier {
    /// Build a classifier with a custom ordered rule list.
    pub fn with_rules(rules: Vec<(String, TaskKind)>) -> Self {
        Self { rules }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::with_rules(
            BASELINE_RULES
                .iter()
                .map(|(keyword, kind)| (keyword.to_string(), *kind))
                .collect(),
        )
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Result<TaskKind> {
        if text.trim().is_empty() {
            return Err(OrchestratorError::Validation(
                "cannot classify an empty request".to_string(),
            ));
        }

        let lowered = text.to_lowercase();
        for (keyword, kind) in &self.rules {
            if lowered.contains(keyword.as_str()) {
                return Ok(*kind);
            }
        }

        Ok(TaskKind::GeneralCopilot)
    }
}
