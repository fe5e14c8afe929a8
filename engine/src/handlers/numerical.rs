//! Numerical task handler
//!
//! Packages simulation-flavored requests into a task descriptor and hands
//! them to the solver backend. Acknowledgment only; result retrieval is
//! the backend's concern.

use crate::context::ContextBundle;
use crate::error::{OrchestratorError, Result};
use crate::orchestrator::SuccessBody;
use crate::solver::{SolverBackend, TaskDescriptor};
use std::sync::Arc;
use tracing::info;

/// Hand-off handler for solver-bound requests
pub struct NumericalTaskHandler {
    backend: Arc<dyn SolverBackend>,
}

impl NumericalTaskHandler {
    pub fn new(backend: Arc<dyn SolverBackend>) -> Self {
        Self { backend }
    }

    /// Forward `{request, context}` to the solver backend's task-submission
    /// interface and return the acknowledgment.
    pub async fn handle(&self, text: &str, context: &ContextBundle) -> Result<SuccessBody> {
        let descriptor = TaskDescriptor {
            request: text.to_string(),
            context: context.clone(),
        };

        let accepted = self.backend.submit(&descriptor).await?;
        if !accepted {
            return Err(OrchestratorError::Dependency(
                "solver backend refused the task".to_string(),
            ));
        }

        info!(session = %context.session_id, "Simulation task forwarded to solver backend");

        let details = serde_json::to_value(&descriptor).map_err(|e| {
            OrchestratorError::Dependency(format!("failed to serialize task descriptor: {}", e))
        })?;

        Ok(SuccessBody::task_forwarded(
            "Simulation task forwarded to the solver backend",
            details,
        ))
    }
}
