//! Wire-level tests for the model service and solver backend clients.

use nucleon_engine::config::{LlmConfig, SolverConfig};
use nucleon_engine::context::ContextBundle;
use nucleon_engine::error::OrchestratorError;
use nucleon_engine::llm::{CompletionClient, OpenAiClient};
use nucleon_engine::solver::{HttpSolverClient, SolverBackend, TaskDescriptor};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn llm_client(base_url: &str, timeout: Duration) -> OpenAiClient {
    let config = LlmConfig {
        base_url: base_url.to_string(),
        ..LlmConfig::default()
    };
    OpenAiClient::new(config, "sk-test".to_string(), timeout).unwrap()
}

fn sample_descriptor() -> TaskDescriptor {
    TaskDescriptor {
        request: "Run the cavity flow simulation".to_string(),
        context: ContextBundle {
            query: "Run the cavity flow simulation".to_string(),
            session_id: "sess-1".to_string(),
            relevant_documents: vec![],
            previous_exchange: None,
        },
    }
}

#[tokio::test]
async fn completion_request_carries_messages_and_budget() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_tokens": 512,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini-2024",
            "choices": [
                { "message": { "content": "Use a staggered grid." } }
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = llm_client(&server.uri(), Duration::from_secs(5));
    let completion = client
        .complete("You are a scientific assistant.", "How do I discretize?", 512)
        .await
        .unwrap();

    assert_eq!(completion.text, "Use a staggered grid.");
    assert_eq!(completion.model, "gpt-4o-mini-2024");
}

#[tokio::test]
async fn rejected_credential_is_a_dependency_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = llm_client(&server.uri(), Duration::from_secs(5));
    let err = client.complete("system", "user", 512).await.unwrap_err();

    assert!(matches!(err, OrchestratorError::Dependency(_)));
    assert!(err.to_string().contains("rejected the credential"));
}

#[tokio::test]
async fn rate_limit_is_reported_as_such() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = llm_client(&server.uri(), Duration::from_secs(5));
    let err = client.complete("system", "user", 512).await.unwrap_err();

    assert!(err.to_string().contains("rate limit"));
}

#[tokio::test]
async fn empty_choices_is_a_dependency_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = llm_client(&server.uri(), Duration::from_secs(5));
    let err = client.complete("system", "user", 512).await.unwrap_err();

    assert!(err.to_string().contains("no content"));
}

#[tokio::test]
async fn slow_model_service_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let client = llm_client(&server.uri(), Duration::from_millis(100));
    let err = client.complete("system", "user", 512).await.unwrap_err();

    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn solver_acceptance_round_trips() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_partial_json(json!({
            "request": "Run the cavity flow simulation",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accepted": true })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SolverConfig {
        base_url: server.uri(),
    };
    let client = HttpSolverClient::new(config, Duration::from_secs(5)).unwrap();

    let accepted = client.submit(&sample_descriptor()).await.unwrap();
    assert!(accepted);
}

#[tokio::test]
async fn solver_refusal_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accepted": false })))
        .mount(&server)
        .await;

    let config = SolverConfig {
        base_url: server.uri(),
    };
    let client = HttpSolverClient::new(config, Duration::from_secs(5)).unwrap();

    let accepted = client.submit(&sample_descriptor()).await.unwrap();
    assert!(!accepted);
}

#[tokio::test]
async fn solver_server_error_is_a_dependency_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(503).set_body_string("queue full"))
        .mount(&server)
        .await;

    let config = SolverConfig {
        base_url: server.uri(),
    };
    let client = HttpSolverClient::new(config, Duration::from_secs(5)).unwrap();

    let err = client.submit(&sample_descriptor()).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Dependency(_)));
    assert!(err.to_string().contains("503"));
}
