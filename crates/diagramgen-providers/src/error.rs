//! Failure taxonomy for one generation request.

use serde_json::Value;
use thiserror::Error;

/// Everything that can end a generation request without a diagram.
///
/// Only [`GenerationError::UnknownProvider`] is the caller's fault; every
/// other variant is reported as a server error with [`details`](Self::details)
/// attached.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The provider identifier has no descriptor. No network call was made.
    #[error("Invalid AI provider")]
    UnknownProvider(String),

    /// Non-2xx status, or no response at all (`status == None`).
    #[error("{}", upstream_summary(.status))]
    Upstream {
        status: Option<u16>,
        /// Upstream error payload, or the transport error message.
        details: Value,
    },

    /// The upstream body did not have the provider's expected shape.
    #[error("Malformed response from AI provider: {0}")]
    MalformedResponse(String),

    /// The extracted value was not a string.
    #[error("Invalid response format from AI provider")]
    InvalidResponseFormat,

    /// Nothing left after stripping fences and whitespace.
    #[error("Empty diagram code received from AI provider")]
    EmptyDiagram,
}

fn upstream_summary(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("API request failed with status {code}"),
        None => "API request failed".to_string(),
    }
}

impl GenerationError {
    /// Whether this maps to a 4xx classification.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GenerationError::UnknownProvider(_))
    }

    /// Short machine-readable message for the `error` field of a response.
    pub fn summary(&self) -> String {
        match self {
            GenerationError::UnknownProvider(_) => self.to_string(),
            GenerationError::Upstream { status, .. } => upstream_summary(status),
            _ => "API request failed".to_string(),
        }
    }

    /// Opaque diagnostic payload for the `details` field of a response.
    pub fn details(&self) -> Value {
        match self {
            GenerationError::Upstream { details, .. } => details.clone(),
            other => Value::String(other.to_string()),
        }
    }

    /// HTTP status returned by the upstream, if a response was received.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GenerationError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}
