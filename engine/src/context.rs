//! Context retrieval
//!
//! Read-side enrichment for an orchestration pass: a bounded set of
//! reference documents plus the most recent prior exchange for the session,
//! assembled into an immutable [`ContextBundle`] before classification and
//! dispatch.

use crate::error::{OrchestratorError, Result};
use crate::store::{ContextStore, Document, Exchange};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// Session bucket used when a request carries no `session_id`
pub const DEFAULT_SESSION: &str = "default";

/// The enrichment payload assembled before dispatch.
///
/// Immutable once constructed for a pass; classifier and handlers treat it
/// as read-only input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextBundle {
    /// The query the bundle was built for
    pub query: String,

    /// Session the bundle is scoped to
    pub session_id: String,

    /// Reference documents, relevance order, bounded by the configured cap
    pub relevant_documents: Vec<Document>,

    /// Most recent prior (request, response) pair for the session, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_exchange: Option<Exchange>,
}

impl ContextBundle {
    /// Render the bundle into a system-prompt injection string:
    /// documents first, then the prior exchange.
    pub fn format_for_prompt(&self) -> String {
        let mut out = String::new();

        if self.relevant_documents.is_empty() {
            out.push_str("No reference documents available.\n");
        } else {
            out.push_str("Reference documents:\n");
            for doc in &self.relevant_documents {
                let _ = writeln!(out, "- [{}] {}", doc.source, doc.content);
            }
        }

        if let Some(exchange) = &self.previous_exchange {
            out.push_str("\nPrevious exchange in this session:\n");
            let _ = writeln!(out, "User: {}", exchange.request);
            let _ = writeln!(out, "Assistant: {}", exchange.response);
        }

        out
    }
}

/// Read-only enrichment lookup against the context store.
pub struct ContextRetriever {
    store: Arc<dyn ContextStore>,
    document_cap: usize,
}

impl ContextRetriever {
    pub fn new(store: Arc<dyn ContextStore>, document_cap: usize) -> Self {
        Self {
            store,
            document_cap,
        }
    }

    /// Fetch up to the configured cap of reference documents and the most
    /// recent prior exchange for the session.
    ///
    /// The orchestrator already validates the query, but this component may
    /// be called directly, so it defends independently. Store failures
    /// propagate unmodified; no retries here.
    pub async fn retrieve(&self, query: &str, session_id: Option<&str>) -> Result<ContextBundle> {
        if query.trim().is_empty() {
            return Err(OrchestratorError::Validation(
                "context lookup requires a non-empty query".to_string(),
            ));
        }

        let session = session_id.unwrap_or(DEFAULT_SESSION);

        let limit = u32::try_from(self.document_cap).unwrap_or(u32::MAX);
        let mut relevant_documents = self.store.fetch_documents(query, limit).await?;

        // The cap holds even if the store over-returns.
        relevant_documents.truncate(self.document_cap);

        let previous_exchange = self.store.last_exchange(session).await?;

        debug!(
            documents = relevant_documents.len(),
            has_history = previous_exchange.is_some(),
            session = session,
            "Context retrieved"
        );

        Ok(ContextBundle {
            query: query.to_string(),
            session_id: session.to_string(),
            relevant_documents,
            previous_exchange,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    struct FixedStore {
        documents: Vec<Document>,
        exchange: Option<Exchange>,
    }

    #[async_trait]
    impl ContextStore for FixedStore {
        async fn fetch_documents(&self, _query: &str, _limit: u32) -> Result<Vec<Document>> {
            // Ignores the limit on purpose: the retriever must enforce the cap.
            Ok(self.documents.clone())
        }

        async fn last_exchange(&self, _session_id: &str) -> Result<Option<Exchange>> {
            Ok(self.exchange.clone())
        }

        async fn record_exchange(&self, _: &str, _: &str, _: &str) -> Result<()> {
            Ok(())
        }
    }

    fn doc(n: usize) -> Document {
        Document {
            id: format!("doc-{}", n),
            source: "notes.md".to_string(),
            content: format!("snippet {}", n),
        }
    }

    #[tokio::test]
    async fn test_empty_query_is_validation_error() {
        let retriever = ContextRetriever::new(
            Arc::new(FixedStore {
                documents: vec![],
                exchange: None,
            }),
            3,
        );
        let err = retriever.retrieve("   ", None).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_cap_enforced_against_overreturning_store() {
        let retriever = ContextRetriever::new(
            Arc::new(FixedStore {
                documents: (0..7).map(doc).collect(),
                exchange: None,
            }),
            3,
        );
        let bundle = retriever.retrieve("mesh", None).await.unwrap();
        assert_eq!(bundle.relevant_documents.len(), 3);
        // Relevance order preserved
        assert_eq!(bundle.relevant_documents[0].id, "doc-0");
    }

    #[tokio::test]
    async fn test_default_session_bucket() {
        let retriever = ContextRetriever::new(
            Arc::new(FixedStore {
                documents: vec![],
                exchange: None,
            }),
            3,
        );
        let bundle = retriever.retrieve("query", None).await.unwrap();
        assert_eq!(bundle.session_id, DEFAULT_SESSION);
        assert!(bundle.previous_exchange.is_none());

        let bundle = retriever.retrieve("query", Some("s-42")).await.unwrap();
        assert_eq!(bundle.session_id, "s-42");
    }

    #[test]
    fn test_format_for_prompt_sections() {
        let bundle = ContextBundle {
            query: "heat transfer".to_string(),
            session_id: "s1".to_string(),
            relevant_documents: vec![doc(1)],
            previous_exchange: Some(Exchange {
                request: "earlier question".to_string(),
                response: "earlier answer".to_string(),
                created_at: Utc::now(),
            }),
        };

        let rendered = bundle.format_for_prompt();
        assert!(rendered.contains("Reference documents:"));
        assert!(rendered.contains("snippet 1"));
        assert!(rendered.contains("Previous exchange in this session:"));
        assert!(rendered.contains("earlier answer"));
    }

    #[test]
    fn test_format_for_prompt_empty() {
        let bundle = ContextBundle {
            query: "q".to_string(),
            session_id: "s".to_string(),
            relevant_documents: vec![],
            previous_exchange: None,
        };
        let rendered = bundle.format_for_prompt();
        assert!(rendered.contains("No reference documents available."));
        assert!(!rendered.contains("Previous exchange"));
    }
}
