//! Shared ingress types

use thiserror::Error;
use voicebridge_egress::EgressError;

/// Ingress error types
///
/// Three-way taxonomy: client input errors surface as 4xx with a short
/// message; failures of the single outbound call surface as 500 with the
/// upstream error body attached for diagnosis; anything unexpected becomes
/// a generic 500. Nothing is retried. Secrets never appear in any body.
#[derive(Debug, Error)]
pub enum IngressError {
    /// Invalid or incomplete request body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Path-traversal attempt on the static handler
    #[error("Forbidden")]
    Forbidden,

    /// Static asset not found
    #[error("Not Found")]
    NotFound,

    /// The outbound call behind this request failed
    #[error("{operation} failed")]
    Upstream {
        /// Short label for the relayed operation
        operation: &'static str,
        #[source]
        source: EgressError,
    },

    /// Unexpected local error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IngressError {
    /// Wrap an egress failure with the label reported to the caller.
    pub fn upstream(operation: &'static str, source: EgressError) -> Self {
        Self::Upstream { operation, source }
    }
}

impl axum::response::IntoResponse for IngressError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        match self {
            IngressError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
            IngressError::Forbidden => {
                (StatusCode::FORBIDDEN, "Forbidden").into_response()
            }
            IngressError::NotFound => {
                (StatusCode::NOT_FOUND, "Not Found").into_response()
            }
            IngressError::Upstream { operation, source } => {
                let details = match source {
                    EgressError::UpstreamStatus { body, .. } => body,
                    other => other.to_string(),
                };
                let body = serde_json::json!({
                    "error": format!("{} failed", operation),
                    "details": details,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
            IngressError::Internal(msg) => {
                let body = serde_json::json!({ "error": msg });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}

/// Ingress result type
pub type IngressResult<T> = Result<T, IngressError>;
