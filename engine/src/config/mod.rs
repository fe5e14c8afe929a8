//! Configuration management
//!
//! This module handles loading and validation of the Nucleon configuration.
//! Configuration is stored in TOML format at ~/.nucleon/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level, data directory, network call timeout
//! - **server**: HTTP bind address
//! - **store**: Context store database path and document cap
//! - **llm**: Model service endpoint, model name, output budget, credential env var
//! - **solver**: Solver backend endpoint
//!
//! The model-service credential itself never lives in the config file: the
//! `llm.api_key_env` field names the environment variable it is read from,
//! once, at process start. Collaborator clients receive their configuration
//! and credential through constructors; nothing reads ambient state at call
//! time.

use crate::error::{OrchestratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Represents the complete Nucleon configuration loaded from
/// ~/.nucleon/config.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Context store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Model service settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Solver backend settings
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Data directory path (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Timeout applied to each outbound network call, in seconds.
    /// A stalled collaborator cannot hang an orchestration pass past this.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the orchestrator listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Context store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path (supports ~ expansion)
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Maximum number of reference documents attached to a pass
    #[serde(default = "default_document_cap")]
    pub document_cap: usize,
}

/// Model service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the chat-completions API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Output-length budget per completion, in tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Name of the environment variable holding the API credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Solver backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Base URL for the solver backend's task-submission API
    #[serde(default = "default_solver_base_url")]
    pub base_url: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.nucleon")
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_bind() -> String {
    "127.0.0.1:8900".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("~/.nucleon/context.db")
}

fn default_document_cap() -> usize {
    3
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_api_key_env() -> String {
    "NUCLEON_API_KEY".to_string()
}

fn default_solver_base_url() -> String {
    "http://127.0.0.1:8700".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            document_cap: default_document_cap(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            base_url: default_solver_base_url(),
        }
    }
}

impl Config {
    /// Default config file location: ~/.nucleon/config.toml
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            OrchestratorError::Configuration("could not determine home directory".to_string())
        })?;
        Ok(home.join(".nucleon").join("config.toml"))
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            OrchestratorError::Configuration(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| {
            OrchestratorError::Configuration(format!("failed to parse config: {}", e))
        })?;

        config.expand_paths();
        Ok(config)
    }

    /// Load configuration from the default location, creating a default
    /// config file on first run.
    pub fn load_or_create() -> Result<Self> {
        let path = Self::default_path()?;

        if !path.exists() {
            let default = Config::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    OrchestratorError::Configuration(format!(
                        "failed to create config directory: {}",
                        e
                    ))
                })?;
            }
            let serialized = toml::to_string_pretty(&default).map_err(|e| {
                OrchestratorError::Configuration(format!("failed to serialize config: {}", e))
            })?;
            fs::write(&path, serialized).map_err(|e| {
                OrchestratorError::Configuration(format!("failed to write config file: {}", e))
            })?;
            tracing::info!("Created default config at {}", path.display());
        }

        Self::load_from_path(&path)
    }

    /// Expand ~ in configured paths to the user's home directory.
    fn expand_paths(&mut self) {
        self.core.data_dir = expand_tilde(&self.core.data_dir);
        self.store.path = expand_tilde(&self.store.path);
    }

    /// Validate the configuration before serving.
    ///
    /// Catches startup-fatal problems (bad bind address, zero budgets)
    /// so they never surface as per-request errors.
    pub fn validate(&self) -> Result<()> {
        self.server.bind.parse::<SocketAddr>().map_err(|e| {
            OrchestratorError::Configuration(format!(
                "server.bind '{}' is not a valid socket address: {}",
                self.server.bind, e
            ))
        })?;

        if self.store.document_cap == 0 {
            return Err(OrchestratorError::Configuration(
                "store.document_cap must be at least 1".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(OrchestratorError::Configuration(
                "llm.max_tokens must be at least 1".to_string(),
            ));
        }

        if self.core.request_timeout_secs == 0 {
            return Err(OrchestratorError::Configuration(
                "core.request_timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Read the model-service credential from the configured environment
    /// variable. Absence is a startup-time fatal condition.
    pub fn resolve_api_key(&self) -> Result<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                OrchestratorError::Configuration(format!(
                    "model service credential is missing; set the {} environment variable",
                    self.llm.api_key_env
                ))
            })
    }
}

/// Expand a leading ~ to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
