//! Knowledge-index egress connector
//!
//! Speaks the managed search service's REST dialect: one POST per query
//! against the index's `docs/search` endpoint, authenticated with the
//! server-held API key. Ranking, vectorization, and semantic re-ranking
//! are entirely the service's concern; the connector only assembles the
//! hybrid query and flattens what comes back.

use crate::{EgressError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use voicebridge_core::types::KnowledgeSnippet;

/// Number of records requested from the index per query.
const TOP_RESULTS: u32 = 5;

/// Candidate pool size for the vector sub-query.
const K_NEAREST_NEIGHBORS: u32 = 50;

/// REST API version pinned against the search service.
const API_VERSION: &str = "2024-07-01";

/// Knowledge-index connector configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the search service
    pub endpoint: String,

    /// Index name to query
    pub index: String,

    /// API key for authentication
    pub api_key: String,

    /// Field projected as the snippet identifier
    pub identifier_field: String,

    /// Field projected as the snippet content
    pub content_field: String,

    /// Embedding field targeted by the vector sub-query
    pub embedding_field: String,

    /// Semantic re-ranking profile; lexical `simple` mode when absent
    pub semantic_configuration: Option<String>,

    /// Whether to attach the vectorizable-text sub-query
    pub use_vector_query: bool,
}

/// Wire shape of the outbound search request
#[derive(Debug, Serialize)]
struct SearchRequest {
    search: String,

    #[serde(rename = "queryType")]
    query_type: &'static str,

    #[serde(rename = "semanticConfiguration", skip_serializing_if = "Option::is_none")]
    semantic_configuration: Option<String>,

    top: u32,

    select: String,

    #[serde(rename = "vectorQueries", skip_serializing_if = "Vec::is_empty")]
    vector_queries: Vec<VectorQuery>,
}

#[derive(Debug, Serialize)]
struct VectorQuery {
    kind: &'static str,
    text: String,
    k: u32,
    fields: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "value", default)]
    records: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Build the hybrid query body: the lexical text query is always present;
/// the vector sub-query only when the flag is enabled.
fn build_search_request(config: &SearchConfig, query: &str) -> SearchRequest {
    let vector_queries = if config.use_vector_query {
        vec![VectorQuery {
            kind: "text",
            text: query.to_string(),
            k: K_NEAREST_NEIGHBORS,
            fields: config.embedding_field.clone(),
        }]
    } else {
        Vec::new()
    };

    SearchRequest {
        search: query.to_string(),
        query_type: if config.semantic_configuration.is_some() {
            "semantic"
        } else {
            "simple"
        },
        semantic_configuration: config.semantic_configuration.clone(),
        top: TOP_RESULTS,
        select: format!("{}, {}", config.identifier_field, config.content_field),
        vector_queries,
    }
}

fn field_as_text(record: &serde_json::Map<String, serde_json::Value>, field: &str) -> String {
    match record.get(field) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Knowledge-index connector
pub struct SearchConnector {
    config: SearchConfig,
    client: Client,
}

impl SearchConnector {
    /// Create a connector around an already-pooled client.
    pub fn new(config: SearchConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Run one hybrid query and return the projected records in
    /// service-returned order. An empty or absent user query is forwarded
    /// as-is; the service owns accepting or rejecting it.
    #[instrument(skip(self, query), fields(index = %self.config.index))]
    pub async fn query(&self, query: &str) -> Result<Vec<KnowledgeSnippet>> {
        let url = format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.index,
            API_VERSION
        );
        let body = build_search_request(&self.config, query);

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(EgressError::UpstreamStatus {
                status_code: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| EgressError::Parse(format!("Malformed search response: {}", e)))?;

        debug!(hits = parsed.records.len(), "knowledge index query completed");

        Ok(parsed
            .records
            .iter()
            .map(|record| KnowledgeSnippet {
                identifier: field_as_text(record, &self.config.identifier_field),
                content: field_as_text(record, &self.config.content_field),
            })
            .collect())
    }
}
