//! VoiceBridge relay server
//!
//! Bridges a browser voice-assistant client to two external services:
//! - A realtime speech deployment reachable over WebRTC (credential
//!   issuance and SDP signaling)
//! - A hybrid-search knowledge index (the `get_chunks` assistant tool)
//!
//! Usage:
//! ```bash
//! # With config file
//! voicebridge-server --config voicebridge.toml
//!
//! # Or fully from environment variables
//! VOICEBRIDGE_SEARCH_ENDPOINT=... VOICEBRIDGE_SPEECH_API_KEY=... voicebridge-server
//!
//! # With both (env vars override the file)
//! VOICEBRIDGE_SPEECH_VOICE=coral voicebridge-server --config voicebridge.toml
//! ```

mod config;

use anyhow::Context;
use clap::Parser;
use config::ServerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use voicebridge_egress::client::{create_client, HttpClientConfig};
use voicebridge_egress::realtime::RealtimeConnector;
use voicebridge_egress::search::SearchConnector;
use voicebridge_ingress::{router, RelayState};

/// VoiceBridge - voice assistant relay server
#[derive(Parser)]
#[command(name = "voicebridge-server")]
#[command(about = "Relay between a browser voice client, a realtime speech deployment, and a knowledge index", long_about = None)]
struct Cli {
    /// Path to configuration file (TOML or YAML)
    #[arg(short, long, value_name = "FILE", env = "VOICEBRIDGE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration; env vars override file values
    let mut config = if let Some(config_path) = cli.config {
        ServerConfig::from_file(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", config_path, e))?
    } else {
        ServerConfig::default()
    };
    config.merge_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Initializing VoiceBridge relay");
    info!(index = %config.search.index, "knowledge index configured");
    info!(deployment = %config.speech.deployment, voice = %config.speech.voice, "speech deployment configured");
    if config.search.use_vector_query {
        info!("hybrid search: vector sub-query enabled");
    }
    if let Some(name) = &config.search.semantic_configuration {
        info!(semantic_configuration = %name, "semantic re-ranking enabled");
    }

    // One pooled client shared by both connectors
    let http = create_client(&HttpClientConfig {
        timeout_secs: config.http_client.timeout_secs,
        connect_timeout_secs: config.http_client.connect_timeout_secs,
        ..HttpClientConfig::default()
    })?;

    let state = RelayState {
        search: Arc::new(SearchConnector::new(config.to_search_config(), http.clone())),
        realtime: Arc::new(RealtimeConnector::new(config.to_realtime_config(), http)),
        policy: Arc::new(config.policy.clone()),
        static_dir: PathBuf::from(&config.static_dir),
    };

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "VoiceBridge listening");

    axum::serve(listener, app).await?;
    Ok(())
}
