//! Session policy delivered to the browser client
//!
//! The policy is opaque configuration from the relay's point of view: it
//! governs the downstream conversational model (voice, temperature, tool
//! roster, prompts) but the relay never executes any of it. Defaults can
//! be overridden from the server config file.

use serde::{Deserialize, Serialize};

/// Static per-deployment assistant policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPolicy {
    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,

    /// Voices the client may offer in its picker.
    #[serde(default = "default_voices")]
    pub voices: Vec<String>,

    #[serde(default = "default_tools")]
    pub tools: Vec<ToolDescriptor>,

    #[serde(default = "default_greeting")]
    pub greeting_prompt: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

/// One callable tool exposed to the realtime model. The only tool shipped
/// by default is the knowledge-base lookup backed by `/chunks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            temperature: default_temperature(),
            transcription_model: default_transcription_model(),
            voices: default_voices(),
            tools: default_tools(),
            greeting_prompt: default_greeting(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_voice() -> String {
    "verse".to_string()
}

fn default_temperature() -> f64 {
    0.6
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_voices() -> Vec<String> {
    ["alloy", "ash", "ballad", "coral", "echo", "sage", "shimmer", "verse"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_tools() -> Vec<ToolDescriptor> {
    vec![ToolDescriptor {
        kind: "function".to_string(),
        name: "get_chunks".to_string(),
        description: "Searches the knowledge base for answers to the \
                      user's question and returns the matching passages."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "description": "The document to get chunks from",
            "properties": {
                "userquery": {
                    "type": "string",
                    "description": "The user query to get chunks for"
                }
            },
            "required": ["userquery"]
        }),
    }]
}

fn default_greeting() -> String {
    "Hi, I'm your voice assistant. Ask me anything covered by the \
     knowledge base and I'll look it up for you."
        .to_string()
}

fn default_system_prompt() -> String {
    r#"You are a helpful assistant who only answers questions using information found via the "get_chunks" tool in the knowledge base. Follow these guidelines:
* Answer Requirements:
    - Keep answers extremely brief, ideally a single sentence, since the user listens via audio.
    - Never read out file names, source names, or keys.
    - Maintain a friendly, approachable tone and avoid sounding robotic.
* Response Process:
    - Search First: Always use the provided tools to check the knowledge base before answering.
    - Inform the User: Always verbally indicate you're looking up the information before accessing datastore tools.
    - Produce a Short Answer: Provide the shortest, most direct answer possible. If the answer isn't in the knowledge base, say "I don't know the answer for that."
    - Handle Invalid Input: If the request is empty or invalid, ask the user to repeat without ending the conversation.
* Conversation Closure:
    At the very end of the conversation, thank the user using a happy tone."#
        .to_string()
}
