//! Turns generated text into bare diagram source.
//!
//! Models are told not to wrap their answer in a code fence but often do
//! anyway, sometimes more than once. Every fence marker is removed wherever
//! it appears; the diagram syntax itself is not validated.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::GenerationError;

/// Three backticks, optionally followed by a `mermaid` (or truncated `mer`)
/// language tag. `mermaid` is tried first so the whole tag is consumed.
static FENCE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:mermaid|mer)?").expect("fence pattern is valid"));

/// Sanitize an extracted response value.
///
/// # Errors
/// - [`GenerationError::InvalidResponseFormat`] if `value` is not a string.
/// - [`GenerationError::EmptyDiagram`] if nothing is left after cleaning.
pub fn sanitize(value: &Value) -> Result<String, GenerationError> {
    match value {
        Value::String(text) => sanitize_str(text),
        _ => Err(GenerationError::InvalidResponseFormat),
    }
}

/// Strip every fence marker from `text`, then trim surrounding whitespace.
pub fn sanitize_str(text: &str) -> Result<String, GenerationError> {
    let cleaned = FENCE_MARKER.replace_all(text, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(GenerationError::EmptyDiagram);
    }
    Ok(cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_mermaid_fence() {
        let out = sanitize_str("```mermaid\ngraph TD\nA-->B\n```").unwrap();
        assert_eq!(out, "graph TD\nA-->B");
    }

    #[test]
    fn test_strips_bare_and_short_tag_fences() {
        assert_eq!(sanitize_str("```\npie\n```").unwrap(), "pie");
        assert_eq!(sanitize_str("```mer\npie\n```").unwrap(), "pie");
    }

    #[test]
    fn test_strips_fences_anywhere() {
        let input = "Here you go:\n```mermaid\ngraph LR\nA-->B\n```\n```mermaid\nC-->D\n```";
        let out = sanitize_str(input).unwrap();
        assert!(!out.contains("```"));
        assert!(!out.contains("mermaid"));
        assert_eq!(out, "Here you go:\n\ngraph LR\nA-->B\n\n\nC-->D");
    }

    #[test]
    fn test_leaves_unfenced_text_alone() {
        let out = sanitize_str("graph TD\n  A-->B").unwrap();
        assert_eq!(out, "graph TD\n  A-->B");
    }

    #[test]
    fn test_idempotent() {
        for input in ["graph TD\n  A-->B", "```mermaid\nsequenceDiagram\n  A->>B: hi\n```"] {
            let once = sanitize_str(input).unwrap();
            assert_eq!(sanitize_str(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(matches!(sanitize_str("   \n\t "), Err(GenerationError::EmptyDiagram)));
        assert!(matches!(sanitize_str(""), Err(GenerationError::EmptyDiagram)));
    }

    #[test]
    fn test_fences_only_is_empty() {
        assert!(matches!(
            sanitize_str("```mermaid\n```\n```"),
            Err(GenerationError::EmptyDiagram)
        ));
    }

    #[test]
    fn test_non_string_values_are_invalid_format() {
        for value in [json!(42), json!({ "code": "graph TD" }), json!(null), json!(["a"]), json!(true)] {
            assert!(matches!(
                sanitize(&value),
                Err(GenerationError::InvalidResponseFormat)
            ));
        }
    }

    #[test]
    fn test_string_value() {
        assert_eq!(sanitize(&json!("```\nflowchart LR\n```")).unwrap(), "flowchart LR");
    }
}
