//! SQLite-backed context store
//!
//! Uses sqlx with WAL mode for concurrent readers. Document lookup is the
//! baseline stub policy: rows whose content matches the query substring sort
//! first, then recency. No similarity ranking. The `ContextStore` trait
//! allows a ranked implementation to replace this one transparently.

use super::{ContextStore, Document, Exchange};
use crate::error::{OrchestratorError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{ConnectOptions, Row};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// SQLite implementation of [`ContextStore`]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path` and run migrations.
    ///
    /// WAL mode lets concurrent orchestration passes read while the
    /// transport layer records exchanges.
    pub async fn new(db_path: &Path) -> anyhow::Result<Self> {
        info!("Opening context store at {}", db_path.display());

        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let connection_string = format!("sqlite:{}", db_path.display());
        let options = SqliteConnectOptions::from_str(&connection_string)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(include_str!("../../migrations/001_initial.sql"))
            .execute(&pool)
            .await?;

        debug!("Context store migrations completed");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a reference document. Used by seeding and diagnostics,
    /// not by the orchestration pass.
    pub async fn insert_document(&self, source: &str, content: &str) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO documents (id, source, content, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(source)
            .bind(content)
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(id)
    }

    /// Number of reference documents currently held. Used by `doctor`.
    pub async fn document_count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }

    /// Close the pool, checkpointing the WAL.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ContextStore for SqliteStore {
    async fn fetch_documents(&self, query: &str, limit: u32) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT id, source, content
            FROM documents
            ORDER BY (CASE WHEN content LIKE '%' || ? || '%' THEN 0 ELSE 1 END),
                     created_at DESC
            LIMIT ?
            "#,
        )
        .bind(query)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        let documents = rows
            .into_iter()
            .map(|row| Document {
                id: row.get("id"),
                source: row.get("source"),
                content: row.get("content"),
            })
            .collect();

        Ok(documents)
    }

    async fn last_exchange(&self, session_id: &str) -> Result<Option<Exchange>> {
        let row = sqlx::query(
            r#"
            SELECT request, response, created_at
            FROM exchanges
            WHERE session_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|row| Exchange {
            request: row.get("request"),
            response: row.get("response"),
            created_at: timestamp_to_datetime(row.get("created_at")),
        }))
    }

    async fn record_exchange(
        &self,
        session_id: &str,
        request: &str,
        response: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO exchanges (id, session_id, request, response, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(session_id)
        .bind(request)
        .bind(response)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        debug!("Recorded exchange for session {}", session_id);
        Ok(())
    }
}

fn store_error(err: sqlx::Error) -> OrchestratorError {
    OrchestratorError::Dependency(format!("context store error: {}", err))
}

fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}
