//! Request dispatcher — exactly one POST per generation request.
//!
//! No retry, no timeout beyond the client's defaults. Transport results are
//! classified into [`GenerationError`] right where they become available.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::registry::ProviderDescriptor;

/// Outbound headers for `descriptor`.
///
/// Static headers go in first; `Content-Type: application/json` and the
/// descriptor's `Authorization` are then set on top, so a static header can
/// never replace the content type.
pub fn build_headers(descriptor: &ProviderDescriptor) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (key, value) in descriptor.static_headers() {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(val)) => {
                headers.insert(name, val);
            }
            _ => warn!(
                provider = descriptor.id().as_str(),
                header = %key,
                "Skipping invalid header"
            ),
        }
    }

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(auth) = descriptor.authorization() {
        match HeaderValue::from_str(auth) {
            Ok(mut val) => {
                val.set_sensitive(true);
                headers.insert(AUTHORIZATION, val);
            }
            Err(_) => warn!(
                provider = descriptor.id().as_str(),
                "Authorization value is not a valid header, sending without it"
            ),
        }
    }

    headers
}

/// POST the descriptor's request body for `prompt` and return the parsed
/// JSON response.
///
/// # Errors
/// - [`GenerationError::Upstream`] with `status: None` when no response was
///   received; `details` is the transport error message.
/// - [`GenerationError::Upstream`] with the status for non-2xx responses;
///   `details` is taken from the body (see [`upstream_details`]).
/// - [`GenerationError::MalformedResponse`] when a 2xx body is not JSON.
pub async fn dispatch(
    client: &reqwest::Client,
    descriptor: &ProviderDescriptor,
    prompt: &str,
) -> Result<Value, GenerationError> {
    let body = descriptor.build_request(prompt);

    debug!(
        provider = descriptor.id().as_str(),
        url = %descriptor.redacted_endpoint(),
        model = descriptor.model(),
        "Dispatching upstream request"
    );

    let response = client
        .post(descriptor.endpoint().clone())
        .headers(build_headers(descriptor))
        .json(&body)
        .send()
        .await
        .map_err(|e| GenerationError::Upstream {
            status: None,
            details: Value::String(e.without_url().to_string()),
        })?;

    let status = response.status();
    debug!(provider = descriptor.id().as_str(), status = %status, "Upstream responded");

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) if status.is_success() => {
            return Err(GenerationError::MalformedResponse(format!(
                "failed to read response body: {}",
                e.without_url()
            )))
        }
        Err(e) => {
            return Err(GenerationError::Upstream {
                status: Some(status.as_u16()),
                details: Value::String(e.without_url().to_string()),
            })
        }
    };

    if !status.is_success() {
        return Err(GenerationError::Upstream {
            status: Some(status.as_u16()),
            details: upstream_details(
                &text,
                &format!("Request failed with status code {}", status.as_u16()),
            ),
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        GenerationError::MalformedResponse(format!("response body is not valid JSON: {e}"))
    })
}

/// Pick the most useful diagnostic payload from an upstream error body.
///
/// Order: the JSON body's `error` field when it carries something, else the
/// whole JSON body, else the raw text, else `fallback`.
pub fn upstream_details(body: &str, fallback: &str) -> Value {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => {
            if let Some(err) = json.get("error").filter(|e| is_truthy(e)) {
                return err.clone();
            }
            if is_truthy(&json) {
                json
            } else {
                Value::String(fallback.to_string())
            }
        }
        Err(_) if !body.trim().is_empty() => Value::String(body.to_string()),
        Err(_) => Value::String(fallback.to_string()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
