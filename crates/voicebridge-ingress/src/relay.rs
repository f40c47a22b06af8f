//! The three relay endpoints and the router
//!
//! Each handler is a stateless pass-through: one inbound request triggers
//! exactly one outbound call, whose response is reshaped and returned.
//! Failures surface immediately; nothing is retried or cached.

use crate::types::{IngressError, IngressResult};
use crate::{policy, static_files};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use voicebridge_core::policy::SessionPolicy;
use voicebridge_core::types::{flatten_snippets, SdpAnswer, SessionCredential};
use voicebridge_egress::realtime::RealtimeConnector;
use voicebridge_egress::search::SearchConnector;

/// Shared handler state: immutable configuration and the injected
/// connectors, both constructed once at startup.
#[derive(Clone)]
pub struct RelayState {
    pub search: Arc<SearchConnector>,
    pub realtime: Arc<RealtimeConnector>,
    pub policy: Arc<SessionPolicy>,
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct ChunksRequest {
    /// Absent or empty queries are forwarded verbatim; the search service
    /// owns accepting or rejecting them.
    #[serde(default)]
    pub userquery: String,
}

/// POST /chunks: knowledge-base query relay.
///
/// Returns the matching snippets as one `text/plain` block. Zero hits
/// yield an empty 2xx body.
pub async fn get_chunks(
    State(state): State<RelayState>,
    Json(req): Json<ChunksRequest>,
) -> IngressResult<Response> {
    info!(query_len = req.userquery.len(), "searching knowledge base");

    let snippets = state
        .search
        .query(&req.userquery)
        .await
        .map_err(|e| IngressError::upstream("Knowledge base query", e))?;

    Ok(flatten_snippets(&snippets).into_response())
}

/// POST /start-session: credential issuance relay.
///
/// Takes no meaningful input; the outbound call is authorized with the
/// server's own key, never the caller's. The issued ephemeral key is
/// returned to the caller but never logged.
pub async fn start_session(
    State(state): State<RelayState>,
) -> IngressResult<Json<SessionCredential>> {
    let credential = state
        .realtime
        .create_session()
        .await
        .map_err(|e| IngressError::upstream("API request", e))?;

    info!(session_id = ?credential.session_id, "realtime session issued");
    Ok(Json(credential))
}

/// POST /webrtc-sdp: signaling relay.
///
/// Both fields are required; a missing field is a client error and no
/// outbound call is made. The SDP text is opaque in both directions.
pub async fn webrtc_sdp(
    State(state): State<RelayState>,
    Json(body): Json<serde_json::Value>,
) -> IngressResult<Json<SdpAnswer>> {
    let ephemeral_key = required_field(&body, "ephemeral_key")?;
    let offer_sdp = required_field(&body, "offer_sdp")?;

    let answer_sdp = state
        .realtime
        .exchange_sdp(ephemeral_key, offer_sdp)
        .await
        .map_err(|e| IngressError::upstream("WebRTC SDP exchange", e))?;

    Ok(Json(SdpAnswer { answer_sdp }))
}

fn required_field<'a>(body: &'a serde_json::Value, name: &str) -> IngressResult<&'a str> {
    body.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| IngressError::InvalidRequest(format!("Missing required field: {}", name)))
}

async fn healthz() -> &'static str {
    "ok"
}

/// Create the relay router around the injected state.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(static_files::index))
        .route("/healthz", get(healthz))
        .route("/policy", get(policy::get_policy))
        .route("/chunks", post(get_chunks))
        .route("/start-session", post(start_session))
        .route("/webrtc-sdp", post(webrtc_sdp))
        .route("/{*file}", get(static_files::asset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_present() {
        let body = serde_json::json!({"ephemeral_key": "ek", "offer_sdp": "v=0"});
        assert_eq!(required_field(&body, "ephemeral_key").unwrap(), "ek");
        assert_eq!(required_field(&body, "offer_sdp").unwrap(), "v=0");
    }

    #[test]
    fn test_required_field_missing_or_wrong_type() {
        let body = serde_json::json!({"offer_sdp": 42});
        assert!(required_field(&body, "ephemeral_key").is_err());
        assert!(required_field(&body, "offer_sdp").is_err());
    }

    #[test]
    fn test_chunks_request_defaults_missing_query_to_empty() {
        let req: ChunksRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.userquery, "");
    }
}
