//! Request orchestrator
//!
//! The single coordinating entry point for one orchestration pass:
//! validate the request, retrieve context, classify, dispatch to the
//! selected handler, and assemble the response envelope. Any step failure
//! is caught here and normalized into an error-status envelope; no raw
//! fault crosses the public boundary.

use crate::classifier::{Classifier, TaskKind};
use crate::context::ContextRetriever;
use crate::error::{OrchestratorError, Result};
use crate::handlers::{CopilotHandler, NumericalTaskHandler};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Inbound unit of work.
///
/// `text` is required and must be a non-empty string; `session_id` is
/// optional and falls back to the default session bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrateRequest {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub session_id: Option<String>,
}

/// Success-path payload of the response envelope.
///
/// Copilot results populate `response` + `model`; solver hand-offs
/// populate `message` + `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl SuccessBody {
    /// Success body for a copilot completion.
    pub fn copilot(response: String, model: String) -> Self {
        Self {
            response: Some(response),
            message: None,
            model: Some(model),
            details: None,
        }
    }

    /// Success body for a solver hand-off acknowledgment.
    pub fn task_forwarded(message: &str, details: serde_json::Value) -> Self {
        Self {
            response: None,
            message: Some(message.to_string()),
            model: None,
            details: Some(details),
        }
    }
}

/// Which failure class an error envelope carries. Not serialized; used by
/// the transport layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorKind {
    Validation,
    #[default]
    Dependency,
    Configuration,
}

/// Outbound unit of work: success XOR error, by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OrchestrateResponse {
    Success(SuccessBody),
    Error {
        message: String,
        #[serde(skip)]
        kind: ErrorKind,
    },
}

impl OrchestrateResponse {
    /// Build a validation-error envelope.
    pub fn validation(message: impl Into<String>) -> Self {
        OrchestrateResponse::Error {
            message: format!("invalid request: {}", message.into()),
            kind: ErrorKind::Validation,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OrchestrateResponse::Success(_))
    }
}

impl From<OrchestratorError> for OrchestrateResponse {
    fn from(err: OrchestratorError) -> Self {
        let kind = match &err {
            OrchestratorError::Validation(_) => ErrorKind::Validation,
            OrchestratorError::Dependency(_) => ErrorKind::Dependency,
            OrchestratorError::Configuration(_) => ErrorKind::Configuration,
        };
        OrchestrateResponse::Error {
            message: err.to_string(),
            kind,
        }
    }
}

/// Top-level coordinator for orchestration passes.
///
/// Owns injected collaborators; holds no mutable state, so concurrent
/// passes share it freely behind an `Arc`.
pub struct Orchestrator {
    retriever: ContextRetriever,
    classifier: Arc<dyn Classifier>,
    copilot: CopilotHandler,
    numerical: NumericalTaskHandler,
    step_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        retriever: ContextRetriever,
        classifier: Arc<dyn Classifier>,
        copilot: CopilotHandler,
        numerical: NumericalTaskHandler,
        step_timeout: Duration,
    ) -> Self {
        Self {
            retriever,
            classifier,
            copilot,
            numerical,
            step_timeout,
        }
    }

    /// Process one request end to end, always producing a well-formed
    /// envelope. This is the only place step errors are converted.
    pub async fn process(&self, request: &OrchestrateRequest) -> OrchestrateResponse {
        match self.run_pass(request).await {
            Ok(body) => OrchestrateResponse::Success(body),
            Err(err) => {
                warn!("Orchestration pass failed: {}", err);
                OrchestrateResponse::from(err)
            }
        }
    }

    /// The pipeline: validate, retrieve, classify, dispatch.
    async fn run_pass(&self, request: &OrchestrateRequest) -> Result<SuccessBody> {
        let text = request
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                OrchestratorError::Validation(
                    "the 'text' field is required and must be a non-empty string".to_string(),
                )
            })?;

        let session_id = request.session_id.as_deref();
        info!(session = session_id.unwrap_or("default"), "Processing request");

        let bundle = self
            .timed(
                "context retrieval",
                self.retriever.retrieve(text, session_id),
            )
            .await?;

        // Local and synchronous; total for non-empty text.
        let decision = self.classifier.classify(text)?;
        debug!(?decision, "Request classified");

        match decision {
            TaskKind::GeneralCopilot => {
                self.timed("copilot completion", self.copilot.handle(text, &bundle))
                    .await
            }
            TaskKind::NumericalTask => {
                self.timed("solver hand-off", self.numerical.handle(text, &bundle))
                    .await
            }
        }
    }

    /// Bound a network step with the configured timeout so a stalled
    /// collaborator cannot hang the pass.
    async fn timed<T>(&self, step: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.step_timeout, fut)
            .await
            .map_err(|_| {
                OrchestratorError::Dependency(format!(
                    "{} timed out after {}s",
                    step,
                    self.step_timeout.as_secs()
                ))
            })?
    }
}
