//! VoiceBridge Core Types
//!
//! This crate provides the types shared across the relay:
//! - Transient request/response shapes (credentials, SDP exchange, snippets)
//! - The session policy delivered to the browser client

pub mod policy;
pub mod types;
