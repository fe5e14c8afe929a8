use super::{Completion, CompletionClient};
use crate::config::LlmConfig;
use crate::error::{OrchestratorError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Chat-completions client for an OpenAI-compatible model service
#[derive(Debug)]
pub struct OpenAiClient {
    config: LlmConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Build a client with an explicit credential and per-call timeout.
    ///
    /// A missing credential is a fatal configuration error: the process
    /// should refuse to serve rather than fail per request.
    pub fn new(config: LlmConfig, api_key: String, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(OrchestratorError::Configuration(format!(
                "model service credential is missing; set the {} environment variable",
                config.api_key_env
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                OrchestratorError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<Completion> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let payload = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OrchestratorError::Dependency("model service timed out".to_string())
                } else {
                    OrchestratorError::Dependency(format!("model service unreachable: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => OrchestratorError::Dependency(format!(
                    "model service rejected the credential: {}",
                    text
                )),
                429 => OrchestratorError::Dependency(
                    "model service rate limit exceeded".to_string(),
                ),
                _ => OrchestratorError::Dependency(format!(
                    "model service returned {}: {}",
                    status, text
                )),
            });
        }

        let data: serde_json::Value = response.json().await.map_err(|e| {
            OrchestratorError::Dependency(format!("failed to parse model response: {}", e))
        })?;

        let content = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| {
                OrchestratorError::Dependency("model response had no content".to_string())
            })?;

        let model = data
            .get("model")
            .and_then(|m| m.as_str())
            .unwrap_or(&self.config.model)
            .to_string();

        Ok(Completion {
            text: content.to_string(),
            model,
        })
    }
}
