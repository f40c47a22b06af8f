//! Realtime speech-service egress connector
//!
//! Two operations against the speech deployment: minting a short-lived
//! session credential with the server-held API key, and forwarding the
//! WebRTC SDP handshake under the caller's ephemeral key. SDP payloads
//! are opaque text in both directions and are never parsed or modified.

use crate::{EgressError, Result};
use reqwest::{header, Client};
use serde_json::json;
use tracing::{debug, instrument};
use voicebridge_core::types::SessionCredential;

/// Speech-service connector configuration
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Session issuance endpoint
    pub sessions_url: String,

    /// WebRTC SDP signaling endpoint
    pub webrtc_url: String,

    /// Server-held API key; never forwarded to or taken from the caller
    pub api_key: String,

    /// Model deployment name
    pub deployment: String,

    /// Voice identifier requested for new sessions
    pub voice: String,
}

/// Speech-service connector
pub struct RealtimeConnector {
    config: RealtimeConfig,
    client: Client,
}

impl RealtimeConnector {
    /// Create a connector around an already-pooled client.
    pub fn new(config: RealtimeConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Mint a session credential from the speech service.
    ///
    /// The issuer may omit the id or the nested secret; either surfaces to
    /// callers as a null field, not as a connector failure. The key itself
    /// is never logged.
    #[instrument(skip(self))]
    pub async fn create_session(&self) -> Result<SessionCredential> {
        let payload = json!({
            "model": self.config.deployment,
            "voice": self.config.voice,
        });

        let response = self
            .client
            .post(&self.config.sessions_url)
            .header("api-key", &self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&payload)
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

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| EgressError::Parse(format!("Malformed session response: {}", e)))?;

        let session_id = data
            .get("id")
            .and_then(|v| v.as_str())
            .map(ToString::to_string);

        let ephemeral_key = data
            .pointer("/client_secret/value")
            .and_then(|v| v.as_str())
            .map(ToString::to_string);

        debug!(session_id = ?session_id, "realtime session created");

        Ok(SessionCredential {
            session_id,
            ephemeral_key,
        })
    }

    /// Forward one SDP offer and return the raw answer text.
    ///
    /// The non-2xx range is failure; the upstream body is carried back for
    /// diagnosis. No retry at any layer.
    #[instrument(skip(self, ephemeral_key, offer_sdp))]
    pub async fn exchange_sdp(&self, ephemeral_key: &str, offer_sdp: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.config.webrtc_url)
            .query(&[("model", self.config.deployment.as_str())])
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", ephemeral_key),
            )
            .header(header::CONTENT_TYPE, "application/sdp")
            .body(offer_sdp.to_string())
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

        debug!("SDP exchange completed");
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_upstream_body() {
        let err = EgressError::UpstreamStatus {
            status_code: 503,
            body: "deployment unavailable".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("deployment unavailable"));
    }

    #[test]
    fn test_config_is_clonable_for_state_sharing() {
        let config = RealtimeConfig {
            sessions_url: "https://speech.example.net/sessions".to_string(),
            webrtc_url: "https://speech.example.net/rtc".to_string(),
            api_key: "k".to_string(),
            deployment: "gpt-4o-realtime".to_string(),
            voice: "verse".to_string(),
        };
        let cloned = config.clone();
        assert_eq!(cloned.deployment, config.deployment);
    }
}
