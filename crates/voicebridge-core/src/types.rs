//! Transient pass-through shapes
//!
//! Nothing here outlives a single request/response cycle; all state
//! ownership lives in the external services.

use serde::{Deserialize, Serialize};

/// Short-lived credential issued by the speech service for one realtime
/// session. Expiry and revocation are owned entirely by the issuer.
///
/// Both fields mirror whatever the issuer returned: a 2xx response with
/// either field absent surfaces as null rather than as a relay failure.
/// Callers must handle the degenerate null cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCredential {
    pub session_id: Option<String>,
    pub ephemeral_key: Option<String>,
}

/// Inbound half of the signaling exchange: the bearer credential plus the
/// client-generated offer. The SDP text is opaque and never parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdpExchangeRequest {
    pub ephemeral_key: String,
    pub offer_sdp: String,
}

/// Outbound half: the remote answer, still opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdpAnswer {
    pub answer_sdp: String,
}

/// One record projected out of the knowledge index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSnippet {
    pub identifier: String,
    pub content: String,
}

impl KnowledgeSnippet {
    /// Render as one block of the flat text response.
    pub fn render(&self) -> String {
        format!("[{}]: {}\n-----\n", self.identifier, self.content)
    }
}

/// Concatenate snippets into the flat text block returned by the relay,
/// preserving service-returned order. Zero snippets yield an empty string.
pub fn flatten_snippets(snippets: &[KnowledgeSnippet]) -> String {
    snippets.iter().map(KnowledgeSnippet::render).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_render() {
        let s = KnowledgeSnippet {
            identifier: "doc_1".to_string(),
            content: "Restart the router from the app.".to_string(),
        };
        assert_eq!(
            s.render(),
            "[doc_1]: Restart the router from the app.\n-----\n"
        );
    }

    #[test]
    fn test_flatten_preserves_order() {
        let snippets = vec![
            KnowledgeSnippet {
                identifier: "b".to_string(),
                content: "second ranked".to_string(),
            },
            KnowledgeSnippet {
                identifier: "a".to_string(),
                content: "first ranked".to_string(),
            },
        ];
        let flat = flatten_snippets(&snippets);
        assert_eq!(flat, "[b]: second ranked\n-----\n[a]: first ranked\n-----\n");
    }

    #[test]
    fn test_flatten_empty() {
        assert_eq!(flatten_snippets(&[]), "");
    }

    #[test]
    fn test_credential_serializes_null_key() {
        let cred = SessionCredential {
            session_id: Some("sess_123".to_string()),
            ephemeral_key: None,
        };
        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(json["session_id"], "sess_123");
        assert!(json["ephemeral_key"].is_null());
    }

    #[test]
    fn test_credential_serializes_null_session_id() {
        let cred = SessionCredential {
            session_id: None,
            ephemeral_key: None,
        };
        let json = serde_json::to_value(&cred).unwrap();
        assert!(json["session_id"].is_null());
        assert!(json["ephemeral_key"].is_null());
    }
}
