// Nucleon orchestration engine
// Main entry point for the nucleon binary

use clap::Parser;
use nucleon_engine::classifier::KeywordClassifier;
use nucleon_engine::cli::{Cli, Command};
use nucleon_engine::config::Config;
use nucleon_engine::context::ContextRetriever;
use nucleon_engine::handlers::{CopilotHandler, NumericalTaskHandler};
use nucleon_engine::llm::OpenAiClient;
use nucleon_engine::orchestrator::Orchestrator;
use nucleon_engine::server::{self, AppState};
use nucleon_engine::solver::HttpSolverClient;
use nucleon_engine::store::{ContextStore, SqliteStore};
use nucleon_engine::telemetry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_or_create()?,
    };

    telemetry::init(Some(&config.core.log_level));

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Doctor => doctor(config).await,
    }
}

/// Construct all collaborators once, then serve.
///
/// Missing credentials or a bad config are startup-fatal here: the process
/// refuses to serve rather than failing per request.
async fn serve(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let api_key = config.resolve_api_key()?;

    let timeout = Duration::from_secs(config.core.request_timeout_secs);

    let store = Arc::new(SqliteStore::new(&config.store.path).await?);
    let llm = Arc::new(OpenAiClient::new(config.llm.clone(), api_key, timeout)?);
    let solver = Arc::new(HttpSolverClient::new(config.solver.clone(), timeout)?);

    let retriever = ContextRetriever::new(
        Arc::clone(&store) as Arc<dyn ContextStore>,
        config.store.document_cap,
    );
    let orchestrator = Orchestrator::new(
        retriever,
        Arc::new(KeywordClassifier::default()),
        CopilotHandler::new(llm, config.llm.max_tokens),
        NumericalTaskHandler::new(solver),
        timeout,
    );

    let addr: SocketAddr = config.server.bind.parse()?;
    let state = AppState::new(
        Arc::new(orchestrator),
        Arc::clone(&store) as Arc<dyn ContextStore>,
    );

    server::serve(addr, state).await
}

/// Report the health of required configuration and collaborators
/// without serving.
async fn doctor(config: Config) -> anyhow::Result<()> {
    println!("Nucleon doctor");
    println!();

    match config.validate() {
        Ok(()) => println!("  Config:       ok (bind {})", config.server.bind),
        Err(err) => println!("  Config:       INVALID ({})", err),
    }

    match config.resolve_api_key() {
        Ok(_) => println!("  Credential:   present ({})", config.llm.api_key_env),
        Err(_) => println!("  Credential:   MISSING ({})", config.llm.api_key_env),
    }

    match SqliteStore::new(&config.store.path).await {
        Ok(store) => {
            let count = store.document_count().await.unwrap_or(0);
            println!(
                "  Store:        ok ({}, {} documents)",
                config.store.path.display(),
                count
            );
            store.close().await;
        }
        Err(err) => println!("  Store:        UNREACHABLE ({})", err),
    }

    println!("  Model:        {} via {}", config.llm.model, config.llm.base_url);
    println!("  Solver:       {}", config.solver.base_url);

    Ok(())
}
