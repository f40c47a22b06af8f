use serde::{Deserialize, Serialize};
use std::path::Path;
use voicebridge_core::policy::SessionPolicy;
use voicebridge_egress::realtime::RealtimeConfig;
use voicebridge_egress::search::SearchConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub speech: SpeechSettings,

    #[serde(default)]
    pub http_client: HttpClientSettings,

    #[serde(default)]
    pub policy: SessionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Knowledge-index settings. Field-name mappings default to the index
/// layout produced by the standard chunking pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub index: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_identifier_field")]
    pub identifier_field: String,

    #[serde(default = "default_content_field")]
    pub content_field: String,

    #[serde(default = "default_embedding_field")]
    pub embedding_field: String,

    #[serde(default = "default_title_field")]
    pub title_field: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_configuration: Option<String>,

    #[serde(default = "default_true")]
    pub use_vector_query: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    #[serde(default)]
    pub sessions_url: String,

    #[serde(default)]
    pub webrtc_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub deployment: String,

    #[serde(default = "default_voice")]
    pub voice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            logging: LoggingConfig::default(),
            search: SearchSettings::default(),
            speech: SpeechSettings::default(),
            http_client: HttpClientSettings::default(),
            policy: SessionPolicy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            index: String::new(),
            api_key: String::new(),
            identifier_field: default_identifier_field(),
            content_field: default_content_field(),
            embedding_field: default_embedding_field(),
            title_field: default_title_field(),
            semantic_configuration: None,
            use_vector_query: true,
        }
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            sessions_url: String::new(),
            webrtc_url: String::new(),
            api_key: String::new(),
            deployment: String::new(),
            voice: default_voice(),
        }
    }
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("VOICEBRIDGE_HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_PORT") {
            if let Ok(port) = val.parse::<u16>() {
                self.port = port;
            }
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_STATIC_DIR") {
            self.static_dir = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_LOG_LEVEL") {
            self.logging.level = val;
        }

        // Knowledge-index settings
        if let Ok(val) = std::env::var("VOICEBRIDGE_SEARCH_ENDPOINT") {
            self.search.endpoint = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SEARCH_INDEX") {
            self.search.index = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SEARCH_API_KEY") {
            self.search.api_key = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SEARCH_IDENTIFIER_FIELD") {
            self.search.identifier_field = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SEARCH_CONTENT_FIELD") {
            self.search.content_field = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SEARCH_EMBEDDING_FIELD") {
            self.search.embedding_field = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SEARCH_TITLE_FIELD") {
            self.search.title_field = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SEARCH_SEMANTIC_CONFIGURATION") {
            // Empty string disables semantic re-ranking entirely
            self.search.semantic_configuration = if val.is_empty() { None } else { Some(val) };
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SEARCH_USE_VECTOR_QUERY") {
            self.search.use_vector_query = val == "true";
        }

        // Speech-service settings
        if let Ok(val) = std::env::var("VOICEBRIDGE_SPEECH_SESSIONS_URL") {
            self.speech.sessions_url = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SPEECH_WEBRTC_URL") {
            self.speech.webrtc_url = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SPEECH_API_KEY") {
            self.speech.api_key = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SPEECH_DEPLOYMENT") {
            self.speech.deployment = val;
        }
        if let Ok(val) = std::env::var("VOICEBRIDGE_SPEECH_VOICE") {
            self.speech.voice = val;
        }
    }

    /// Reject startup with unusable upstream settings instead of failing
    /// on the first relayed request.
    pub fn validate(&self) -> Result<(), String> {
        if self.search.endpoint.is_empty() {
            return Err("search.endpoint is required".to_string());
        }
        if self.search.index.is_empty() {
            return Err("search.index is required".to_string());
        }
        if self.search.api_key.is_empty() {
            return Err("search.api_key is required".to_string());
        }
        if self.speech.sessions_url.is_empty() {
            return Err("speech.sessions_url is required".to_string());
        }
        if self.speech.webrtc_url.is_empty() {
            return Err("speech.webrtc_url is required".to_string());
        }
        if self.speech.api_key.is_empty() {
            return Err("speech.api_key is required".to_string());
        }
        if self.speech.deployment.is_empty() {
            return Err("speech.deployment is required".to_string());
        }
        Ok(())
    }

    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig {
            endpoint: self.search.endpoint.clone(),
            index: self.search.index.clone(),
            api_key: self.search.api_key.clone(),
            identifier_field: self.search.identifier_field.clone(),
            content_field: self.search.content_field.clone(),
            embedding_field: self.search.embedding_field.clone(),
            semantic_configuration: self.search.semantic_configuration.clone(),
            use_vector_query: self.search.use_vector_query,
        }
    }

    pub fn to_realtime_config(&self) -> RealtimeConfig {
        RealtimeConfig {
            sessions_url: self.speech.sessions_url.clone(),
            webrtc_url: self.speech.webrtc_url.clone(),
            api_key: self.speech.api_key.clone(),
            deployment: self.speech.deployment.clone(),
            voice: self.speech.voice.clone(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "./static".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_identifier_field() -> String {
    "chunk_id".to_string()
}

fn default_content_field() -> String {
    "chunk".to_string()
}

fn default_embedding_field() -> String {
    "text_vector".to_string()
}

fn default_title_field() -> String {
    "title".to_string()
}

fn default_voice() -> String {
    "verse".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
