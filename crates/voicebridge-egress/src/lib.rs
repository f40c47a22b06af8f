//! VoiceBridge Egress Connectors
//!
//! This crate provides the relay's outbound connectors:
//! - Knowledge-index connector (hybrid lexical + vector search)
//! - Realtime speech-service connector (session issuance, SDP exchange)

use thiserror::Error;

pub mod client;
pub mod realtime;
pub mod search;

/// Egress error types
#[derive(Debug, Error)]
pub enum EgressError {
    /// Transport-level failure on the outbound call
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered outside the 2xx range; the body is carried
    /// verbatim for diagnosis
    #[error("Upstream returned status {status_code}: {body}")]
    UpstreamStatus { status_code: u16, body: String },

    /// Upstream answered 2xx but the body did not have the expected shape
    #[error("Failed to parse upstream response: {0}")]
    Parse(String),

    /// Invalid connector configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Egress result type
pub type Result<T> = std::result::Result<T, EgressError>;
