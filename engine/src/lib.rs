//! Nucleon Engine Library
//!
//! Request orchestration core for the scientific copilot platform: one
//! enrichment/classification/dispatch pass per inbound request. Used by
//! both the `nucleon` binary and integration tests.

/// Configuration management module
pub mod config;

/// Error taxonomy for the orchestration core
pub mod error;

/// Context store collaborator (trait + SQLite implementation)
pub mod store;

/// Context retrieval and bundle assembly
pub mod context;

/// Task classification
pub mod classifier;

/// Language-model collaborator
pub mod llm;

/// Solver backend collaborator
pub mod solver;

/// Task handlers (copilot, numerical hand-off)
pub mod handlers;

/// Request orchestrator and response envelope
pub mod orchestrator;

/// HTTP server
pub mod server;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;
