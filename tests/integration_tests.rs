//! Integration tests using a mock HTTP server
//!
//! Exercises the full flow: request construction → pagination → extraction →
//! validation → emission → state checkpointing.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempo_connect::auth::BearerToken;
use tempo_connect::config::ConnectorConfig;
use tempo_connect::engine::{LogLevel, Message, SyncEngine};
use tempo_connect::http::{HttpClient, HttpClientConfig};
use tempo_connect::state::StateManager;
use tempo_connect::streams::worklogs;
use tempo_connect::types::BackoffType;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(100),
        )
        .no_rate_limit()
        .build();
    HttpClient::with_config(config)
}

fn engine_for(server: &MockServer, config: ConnectorConfig, state: StateManager) -> SyncEngine {
    SyncEngine::new(client_for(server), state, config)
}

fn records(messages: &[Message]) -> Vec<&serde_json::Value> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Record { record, .. } => Some(record),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_follows_next_url_and_merges_cursor_over_base_params() {
    let server = MockServer::start().await;

    // Page 2: matched only when the continuation cursor is present,
    // merged over the unchanged base params
    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .and(query_param("cursor", "abc"))
        .and(query_param("orderBy", "UPDATED"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"tempoWorklogId": 2, "self": "https://api/w/2"}],
            "metadata": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Page 1: hands out the continuation URL
    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"tempoWorklogId": 1, "self": "https://api/w/1"}],
            "metadata": {"next": format!("{}/worklogs?cursor=abc", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine_for(
        &server,
        ConnectorConfig::new("tok"),
        StateManager::in_memory(),
    );
    let messages = engine.sync_stream(&worklogs()).await.unwrap();

    assert_eq!(engine.stats().pages_fetched, 2);
    let emitted = records(&messages);
    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[0]["tempoWorklogId"], json!(1));
    assert_eq!(emitted[1]["tempoWorklogId"], json!(2));
}

// ============================================================================
// Request shape
// ============================================================================

#[tokio::test]
async fn test_request_shape_with_start_date_and_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Content-Type", "application/json"))
        .and(query_param("updatedFrom", "2024-01-01T00:00:00Z"))
        .and(query_param("orderBy", "UPDATED"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let http_config = HttpClientConfig::from_connector(
        &server.uri(),
        &tempo_connect::config::HttpConfig::default(),
        None,
    );
    let client = HttpClient::with_credentials(
        http_config,
        Arc::new(BearerToken::new("test-token").unwrap()),
    );

    let config = ConnectorConfig::new("test-token")
        .with_start_date("2024-01-01T00:00:00Z".parse().unwrap());
    let mut engine = SyncEngine::new(client, StateManager::in_memory(), config);

    engine.sync_stream(&worklogs()).await.unwrap();
}

// ============================================================================
// Post-processing
// ============================================================================

#[tokio::test]
async fn test_org_id_stamped_into_every_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"tempoWorklogId": 1, "self": "https://api/w/1"},
                {"tempoWorklogId": 2, "self": "https://api/w/2", "org_id": "SOURCE"}
            ]
        })))
        .mount(&server)
        .await;

    let config = ConnectorConfig::new("tok").with_org_id("ORG1");
    let mut engine = engine_for(&server, config, StateManager::in_memory());
    let messages = engine.sync_stream(&worklogs()).await.unwrap();

    // Stamped regardless of source data
    for record in records(&messages) {
        assert_eq!(record["org_id"], json!("ORG1"));
    }
}

// ============================================================================
// Validation failures
// ============================================================================

#[tokio::test]
async fn test_missing_primary_key_drops_record_but_page_still_emits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"self": "https://api/w/none", "description": "no primary key"},
                {"tempoWorklogId": 2, "self": "https://api/w/2"}
            ]
        })))
        .mount(&server)
        .await;

    let mut engine = engine_for(
        &server,
        ConnectorConfig::new("tok"),
        StateManager::in_memory(),
    );
    let messages = engine.sync_stream(&worklogs()).await.unwrap();

    let emitted = records(&messages);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0]["tempoWorklogId"], json!(2));

    assert_eq!(engine.stats().records_dropped, 1);
    assert!(messages.iter().any(|m| matches!(
        m,
        Message::Log { level: LogLevel::Error, message } if message.contains("tempoWorklogId")
    )));
}

#[tokio::test]
async fn test_type_mismatch_drops_record_and_stream_continues() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"tempoWorklogId": 1, "self": "https://api/w/1", "updatedAt": 12345},
                {"tempoWorklogId": 2, "self": "https://api/w/2", "updatedAt": "2024-03-01T00:00:00Z"}
            ]
        })))
        .mount(&server)
        .await;

    let mut engine = engine_for(
        &server,
        ConnectorConfig::new("tok"),
        StateManager::in_memory(),
    );
    let messages = engine.sync_stream(&worklogs()).await.unwrap();

    let emitted = records(&messages);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0]["tempoWorklogId"], json!(2));
    assert_eq!(engine.stats().records_dropped, 1);
}

#[tokio::test]
async fn test_fail_stream_policy_aborts_on_validation_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"tempoWorklogId": "not-a-number-at-all", "self": "https://api/w/1"}]
        })))
        .mount(&server)
        .await;

    let mut config = ConnectorConfig::new("tok");
    config.validation = tempo_connect::config::ValidationPolicy::FailStream;

    let mut engine = engine_for(&server, config, StateManager::in_memory());
    assert!(engine.sync_stream(&worklogs()).await.is_err());
}

// ============================================================================
// Numeric precision
// ============================================================================

#[tokio::test]
async fn test_decimal_precision_survives_full_pipeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                r#"{"results": [{"tempoWorklogId": 9007199254740993, "self": "https://api/w/1", "customAmount": 123456789012345.5}]}"#,
                "application/json",
            ),
        )
        .mount(&server)
        .await;

    let mut engine = engine_for(
        &server,
        ConnectorConfig::new("tok"),
        StateManager::in_memory(),
    );
    let messages = engine.sync_stream(&worklogs()).await.unwrap();

    let emitted = records(&messages);
    assert_eq!(emitted[0]["tempoWorklogId"].to_string(), "9007199254740993");
    // Unknown field passed through with its exact decimal text
    assert_eq!(emitted[0]["customAmount"].to_string(), "123456789012345.5");
}

// ============================================================================
// Retry behavior
// ============================================================================

#[tokio::test]
async fn test_transient_500_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"tempoWorklogId": 1, "self": "https://api/w/1"}]
        })))
        .mount(&server)
        .await;

    let mut engine = engine_for(
        &server,
        ConnectorConfig::new("tok"),
        StateManager::in_memory(),
    );
    let messages = engine.sync_stream(&worklogs()).await.unwrap();

    assert_eq!(records(&messages).len(), 1);
}

#[tokio::test]
async fn test_persistent_500_fails_stream_after_retry_ceiling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(1),
            Duration::from_millis(10),
        )
        .no_rate_limit()
        .build();
    let mut engine = SyncEngine::new(
        HttpClient::with_config(config),
        StateManager::in_memory(),
        ConnectorConfig::new("tok"),
    );

    let err = engine.sync_stream(&worklogs()).await.unwrap_err();
    assert!(err.is_retryable() || matches!(err, tempo_connect::Error::MaxRetriesExceeded { .. }));
}

// ============================================================================
// State checkpointing and resumption
// ============================================================================

#[tokio::test]
async fn test_watermark_checkpointed_and_used_as_next_cursor() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");

    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .and(query_param("updatedFrom", "1970-01-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"tempoWorklogId": 1, "self": "https://api/w/1", "updatedAt": "2024-06-01T12:00:00Z"},
                {"tempoWorklogId": 2, "self": "https://api/w/2", "updatedAt": "2024-05-01T00:00:00Z"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // First run starts from the epoch and observes the max updatedAt
    {
        let state = StateManager::new(&state_path);
        let mut engine = engine_for(&server, ConnectorConfig::new("tok"), state);
        engine.sync_stream(&worklogs()).await.unwrap();

        let snapshot = engine.state().snapshot().await;
        assert_eq!(
            snapshot.get_watermark("worklogs").unwrap().to_rfc3339(),
            "2024-06-01T12:00:00+00:00"
        );
    }

    // Second run resumes from the persisted watermark
    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .and(query_param("updatedFrom", "2024-06-01T12:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let state = StateManager::from_file(&state_path).unwrap();
    let mut engine = engine_for(&server, ConnectorConfig::new("tok"), state);
    engine.sync_stream(&worklogs()).await.unwrap();
}

#[tokio::test]
async fn test_checkpoint_survives_failure_on_later_page() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");

    // Page 2 is a hard failure
    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .and(query_param("cursor", "next"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    // Page 1 emits and points at page 2
    Mock::given(method("GET"))
        .and(path("/worklogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"tempoWorklogId": 1, "self": "https://api/w/1", "updatedAt": "2024-04-01T00:00:00Z"}
            ],
            "metadata": {"next": format!("{}/worklogs?cursor=next", server.uri())}
        })))
        .mount(&server)
        .await;

    let state = StateManager::new(&state_path);
    let mut engine = engine_for(&server, ConnectorConfig::new("tok"), state);
    assert!(engine.sync_stream(&worklogs()).await.is_err());

    // The page-1 checkpoint is intact on disk
    let restored = StateManager::from_file(&state_path).unwrap();
    assert_eq!(
        restored
            .get_watermark("worklogs")
            .await
            .unwrap()
            .to_rfc3339(),
        "2024-04-01T00:00:00+00:00"
    );
}
