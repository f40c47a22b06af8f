//! VoiceBridge Ingress
//!
//! This crate provides the relay's HTTP surface:
//! - The three relay endpoints (knowledge query, credential issuance,
//!   SDP signaling)
//! - Static asset serving with a directory-traversal guard
//! - The session-policy endpoint consumed by the browser client

pub mod policy;
pub mod relay;
pub mod static_files;
pub mod types;

pub use relay::{router, RelayState};
pub use types::{IngressError, IngressResult};
