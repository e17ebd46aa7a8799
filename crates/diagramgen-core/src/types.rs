//! JSON bodies for the HTTP surface.
//!
//! Inbound bodies are lenient (`#[serde(default)]`) so that a missing field
//! turns into a domain error rather than a framework rejection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /api/generate` request body.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerateRequest {
    /// Free-text description of the wanted diagram.
    pub text: String,
    /// Provider wire name (`"deepseek"`, `"gemini"`). Kept as raw JSON so a
    /// non-string value is an unknown provider, not a body rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Value>,
}

impl GenerateRequest {
    /// The provider name, when one was sent as a string.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().and_then(Value::as_str)
    }
}

/// `POST /api/simulate` request body.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulateRequest {
    pub text: String,
}

/// Successful response carrying diagram source.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CodeResponse {
    pub code: String,
}

impl CodeResponse {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Error response body.
///
/// `details` is an opaque diagnostic payload: a string for transport and
/// post-processing failures, whatever the upstream returned otherwise.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    /// Error without a details payload.
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Error with a details payload.
    pub fn with_details(error: impl Into<String>, details: Value) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}

/// `GET /health` response body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
