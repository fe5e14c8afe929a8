//! Error types
//!
//! Every failure an orchestration pass can produce collapses into one of
//! three categories, and the category alone decides how the HTTP layer
//! answers: the caller's fault (validation), a collaborator's fault
//! (dependency), or the operator's fault (configuration).

use thiserror::Error;

/// Orchestrator error taxonomy
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The request itself is malformed; nothing downstream was contacted.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A collaborator (context store, model service, solver backend)
    /// failed, stalled, or answered nonsense.
    #[error("dependency failure: {0}")]
    Dependency(String),

    /// The process is set up wrong; requests cannot fix this.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl OrchestratorError {
    /// True when the failure is attributable to the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, OrchestratorError::Validation(_))
    }
}

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, OrchestratorError>;
