//! Solver backend collaborator
//!
//! Simulation-flavored requests are handed off to the external numerical
//! solver through the [`SolverBackend`] trait: a structured task descriptor
//! in, a synchronous acknowledgment out. Scheduling, convergence, and result
//! delivery are the backend's business and out of scope here.

use crate::config::SolverConfig;
use crate::context::ContextBundle;
use crate::error::{OrchestratorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Task descriptor forwarded to the solver backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// The original user request text
    pub request: String,

    /// The context bundle assembled for the pass
    pub context: ContextBundle,
}

/// Task-submission interface to the solver backend.
#[async_trait]
pub trait SolverBackend: Send + Sync {
    /// Submit a task descriptor; returns whether the backend accepted it.
    async fn submit(&self, descriptor: &TaskDescriptor) -> Result<bool>;
}

#[derive(Debug, Deserialize)]
struct SubmitAck {
    accepted: bool,
}

/// HTTP implementation of [`SolverBackend`]
pub struct HttpSolverClient {
    config: SolverConfig,
    client: reqwest::Client,
}

impl HttpSolverClient {
    pub fn new(config: SolverConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                OrchestratorError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl SolverBackend for HttpSolverClient {
    async fn submit(&self, descriptor: &TaskDescriptor) -> Result<bool> {
        let url = format!("{}/tasks", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(descriptor)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OrchestratorError::Dependency("solver backend timed out".to_string())
                } else {
                    OrchestratorError::Dependency(format!("solver backend unreachable: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(OrchestratorError::Dependency(format!(
                "solver backend returned {}: {}",
                status, text
            )));
        }

        let ack: SubmitAck = response.json().await.map_err(|e| {
            OrchestratorError::Dependency(format!("failed to parse solver acknowledgment: {}", e))
        })?;

        Ok(ack.accepted)
    }
}
