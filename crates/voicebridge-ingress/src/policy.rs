//! Session-policy endpoint
//!
//! The policy (voice roster, tool descriptors, prompts) is opaque
//! configuration consumed by the browser client when it opens a realtime
//! session; the relay only serves it.

use crate::relay::RelayState;
use axum::{extract::State, Json};
use voicebridge_core::policy::SessionPolicy;

/// GET /policy: the assistant policy for this deployment.
pub async fn get_policy(State(state): State<RelayState>) -> Json<SessionPolicy> {
    Json(state.policy.as_ref().clone())
}
