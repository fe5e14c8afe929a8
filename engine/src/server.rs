//! HTTP server
//!
//! Exposes the orchestrator's public entry point (`POST /orchestrate`) and a
//! health check. The payload is taken as a raw JSON value so that a missing
//! or wrongly-typed `text` field surfaces as the orchestrator's validation
//! envelope rather than an extractor rejection.
//!
//! After a successful pass the (request, response) pair is recorded to the
//! context store, best-effort: a failed write is logged, never failing the
//! response. The orchestration pass itself stays write-free.

use crate::context::DEFAULT_SESSION;
use crate::orchestrator::{ErrorKind, OrchestrateRequest, OrchestrateResponse, Orchestrator};
use crate::store::ContextStore;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
    store: Arc<dyn ContextStore>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, store: Arc<dyn ContextStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/orchestrate", post(orchestrate_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Orchestrator listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn status_for(response: &OrchestrateResponse) -> StatusCode {
    match response {
        OrchestrateResponse::Success(_) => StatusCode::OK,
        OrchestrateResponse::Error { kind, .. } => match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Dependency => StatusCode::BAD_GATEWAY,
            ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

async fn orchestrate_handler(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> (StatusCode, Json<OrchestrateResponse>) {
    let request: OrchestrateRequest = match serde_json::from_value(payload) {
        Ok(request) => request,
        Err(_) => {
            let response =
                OrchestrateResponse::validation("the 'text' field must be a string");
            return (status_for(&response), Json(response));
        }
    };

    let response = state.orchestrator.process(&request).await;

    if let OrchestrateResponse::Success(body) = &response {
        let session = request.session_id.as_deref().unwrap_or(DEFAULT_SESSION);
        let text = request.text.as_deref().unwrap_or_default();
        let reply = body
            .response
            .as_deref()
            .or(body.message.as_deref())
            .unwrap_or_default();

        if let Err(err) = state.store.record_exchange(session, text, reply).await {
            warn!(session = session, "Failed to record exchange: {}", err);
        }
    }

    (status_for(&response), Json(response))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "nucleon",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
