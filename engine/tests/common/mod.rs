//! Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use nucleon_engine::classifier::KeywordClassifier;
use nucleon_engine::context::ContextRetriever;
use nucleon_engine::error::{OrchestratorError, Result};
use nucleon_engine::handlers::{CopilotHandler, NumericalTaskHandler};
use nucleon_engine::llm::{Completion, CompletionClient};
use nucleon_engine::orchestrator::Orchestrator;
use nucleon_engine::solver::{SolverBackend, TaskDescriptor};
use nucleon_engine::store::{ContextStore, Document, Exchange};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory context store with call counters and a failure switch.
#[derive(Default)]
pub struct MockStore {
    pub documents: Vec<Document>,
    pub exchange: Option<Exchange>,
    pub fail_fetch: bool,
    pub fetch_calls: AtomicUsize,
    pub recorded: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl ContextStore for MockStore {
    async fn fetch_documents(&self, _query: &str, _limit: u32) -> Result<Vec<Document>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(OrchestratorError::Dependency(
                "context store error: connection refused".to_string(),
            ));
        }
        Ok(self.documents.clone())
    }

    async fn last_exchange(&self, _session_id: &str) -> Result<Option<Exchange>> {
        Ok(self.exchange.clone())
    }

    async fn record_exchange(&self, session_id: &str, request: &str, response: &str) -> Result<()> {
        self.recorded.lock().unwrap().push((
            session_id.to_string(),
            request.to_string(),
            response.to_string(),
        ));
        Ok(())
    }
}

/// Canned completion client that records the system prompts it receives.
pub struct MockLlm {
    pub reply: String,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub system_prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            delay: None,
            calls: AtomicUsize::new(0),
            system_prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionClient for MockLlm {
    async fn complete(&self, system: &str, _user: &str, _max_tokens: u32) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.system_prompts.lock().unwrap().push(system.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Completion {
            text: self.reply.clone(),
            model: "mock-model".to_string(),
        })
    }
}

/// Solver backend that records submitted descriptors.
pub struct MockSolver {
    pub accept: bool,
    pub calls: AtomicUsize,
    pub submitted: Mutex<Vec<TaskDescriptor>>,
}

impl MockSolver {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SolverBackend for MockSolver {
    async fn submit(&self, descriptor: &TaskDescriptor) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(descriptor.clone());
        Ok(self.accept)
    }
}

/// Wire the orchestrator with the given mocks and a 30s step timeout.
pub fn orchestrator_with(
    store: Arc<MockStore>,
    llm: Arc<MockLlm>,
    solver: Arc<MockSolver>,
) -> Orchestrator {
    orchestrator_with_timeout(store, llm, solver, Duration::from_secs(30))
}

pub fn orchestrator_with_timeout(
    store: Arc<MockStore>,
    llm: Arc<MockLlm>,
    solver: Arc<MockSolver>,
    step_timeout: Duration,
) -> Orchestrator {
    Orchestrator::new(
        ContextRetriever::new(store as Arc<dyn ContextStore>, 3),
        Arc::new(KeywordClassifier::default()),
        CopilotHandler::new(llm as Arc<dyn CompletionClient>, 512),
        NumericalTaskHandler::new(solver as Arc<dyn SolverBackend>),
        step_timeout,
    )
}

pub fn sample_document(n: usize) -> Document {
    Document {
        id: format!("doc-{}", n),
        source: "reference.md".to_string(),
        content: format!("reference snippet {}", n),
    }
}
