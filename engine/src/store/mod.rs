//! Context store collaborator
//!
//! The orchestration core consumes the store through the [`ContextStore`]
//! trait: reference documents by query, and the most recent prior exchange
//! for a session. The baseline implementation is SQLite ([`SqliteStore`]),
//! but a vector index or remote service can be substituted behind the same
//! trait without touching the orchestrator.
//!
//! An orchestration pass never writes to the store. Exchange recording is
//! done by the HTTP layer after a pass completes, so concurrent passes need
//! no locking here.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod sqlite;

pub use sqlite::SqliteStore;

/// A reference document retrieved for context enrichment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Opaque document identifier
    pub id: String,

    /// Where the document came from (file name, dataset, URL)
    pub source: String,

    /// Document content snippet
    pub content: String,
}

/// One prior (request, response) pair for a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exchange {
    /// The user request text
    pub request: String,

    /// The response text produced for that request
    pub response: String,

    /// When the exchange was recorded
    pub created_at: DateTime<Utc>,
}

/// Read/write interface to the persistent context store.
///
/// `fetch_documents` and `last_exchange` are the read side used by the
/// orchestration pass; `record_exchange` is the write side used by the
/// transport layer after a pass succeeds.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Fetch up to `limit` reference documents relevant to `query`,
    /// most relevant first. May return fewer, including none.
    async fn fetch_documents(&self, query: &str, limit: u32) -> Result<Vec<Document>>;

    /// Fetch the most recent prior exchange for `session_id`, if any.
    /// No history is a normal, non-error outcome.
    async fn last_exchange(&self, session_id: &str) -> Result<Option<Exchange>>;

    /// Record a completed (request, response) pair for `session_id`.
    async fn record_exchange(&self, session_id: &str, request: &str, response: &str)
        -> Result<()>;
}
