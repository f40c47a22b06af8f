//! Integration tests for the knowledge-index connector using wiremock
//!
//! These tests mock the search service to verify the connector's HTTP
//! behavior: query assembly, projection, ordering, and error surfacing.

use voicebridge_egress::search::{SearchConfig, SearchConnector};
use voicebridge_egress::{client, EgressError};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

fn test_config(endpoint: String) -> SearchConfig {
    SearchConfig {
        endpoint,
        index: "kb".to_string(),
        api_key: "search-key".to_string(),
        identifier_field: "chunk_id".to_string(),
        content_field: "chunk".to_string(),
        embedding_field: "text_vector".to_string(),
        semantic_configuration: None,
        use_vector_query: true,
    }
}

fn connector(config: SearchConfig) -> SearchConnector {
    let http = client::create_client(&client::HttpClientConfig::default()).unwrap();
    SearchConnector::new(config, http)
}

#[tokio::test]
async fn test_query_returns_projected_records_in_service_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/kb/docs/search"))
        .and(query_param("api-version", "2024-07-01"))
        .and(header("api-key", "search-key"))
        .and(body_partial_json(serde_json::json!({
            "search": "router reset",
            "queryType": "simple",
            "top": 5,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                {"chunk_id": "doc_9", "chunk": "Hold the reset button."},
                {"chunk_id": "doc_2", "chunk": "Use the app instead."}
            ]
        })))
        .mount(&mock_server)
        .await;

    let snippets = connector(test_config(mock_server.uri()))
        .query("router reset")
        .await
        .unwrap();

    // Service-determined ranking order is preserved, never re-sorted.
    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0].identifier, "doc_9");
    assert_eq!(snippets[0].content, "Hold the reset button.");
    assert_eq!(snippets[1].identifier, "doc_2");
}

#[tokio::test]
async fn test_zero_hits_yield_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/kb/docs/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})),
        )
        .mount(&mock_server)
        .await;

    let snippets = connector(test_config(mock_server.uri()))
        .query("nothing matches this")
        .await
        .unwrap();

    assert!(snippets.is_empty());
}

/// Matcher asserting the outbound body carries no vector sub-query at all.
struct NoVectorQueries;

impl Match for NoVectorQueries {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<serde_json::Value>(&request.body)
            .map(|body| body.get("vectorQueries").is_none())
            .unwrap_or(false)
    }
}

#[tokio::test]
async fn test_disabled_vector_flag_sends_lexical_query_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/kb/docs/search"))
        .and(NoVectorQueries)
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(mock_server.uri());
    config.use_vector_query = false;

    connector(config).query("router reset").await.unwrap();
}

#[tokio::test]
async fn test_vector_sub_query_shape_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/kb/docs/search"))
        .and(body_partial_json(serde_json::json!({
            "vectorQueries": [{
                "kind": "text",
                "text": "router reset",
                "k": 50,
                "fields": "text_vector",
            }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    connector(test_config(mock_server.uri()))
        .query("router reset")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_semantic_configuration_switches_query_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/kb/docs/search"))
        .and(body_partial_json(serde_json::json!({
            "queryType": "semantic",
            "semanticConfiguration": "kb-semantic",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(mock_server.uri());
    config.semantic_configuration = Some("kb-semantic".to_string());

    connector(config).query("router reset").await.unwrap();
}

#[tokio::test]
async fn test_upstream_failure_surfaces_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/indexes/kb/docs/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;

    let err = connector(test_config(mock_server.uri()))
        .query("router reset")
        .await
        .unwrap_err();

    match err {
        EgressError::UpstreamStatus { status_code, body } => {
            assert_eq!(status_code, 403);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected UpstreamStatus, got {:?}", other),
    }
}
