//! Provider registry — one descriptor per supported upstream.
//!
//! Each [`ProviderDescriptor`] variant fully describes how to call one
//! provider: endpoint, auth, static headers, request body, and where the
//! generated text lives in the response. Everything outside this module
//! treats all providers identically; adding a provider means adding a
//! [`ProviderId`] member and a descriptor variant here.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use reqwest::Url;
use serde_json::{json, Value};

use diagramgen_core::config::{ProviderConfig, ProvidersConfig};

use crate::error::GenerationError;
use crate::prompt::diagram_prompt;

// ─────────────────────────────────────────────
// ProviderId
// ─────────────────────────────────────────────

/// Closed set of supported providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderId {
    DeepSeek,
    Gemini,
}

impl ProviderId {
    /// Every supported provider, in display order.
    pub const ALL: &'static [ProviderId] = &[ProviderId::DeepSeek, ProviderId::Gemini];

    /// Wire name used in request bodies and config keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::DeepSeek => "deepseek",
            ProviderId::Gemini => "gemini",
        }
    }

    /// Human-readable name for logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::DeepSeek => "DeepSeek",
            ProviderId::Gemini => "Gemini",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| GenerationError::UnknownProvider(s.to_string()))
    }
}

// ─────────────────────────────────────────────
// Descriptors
// ─────────────────────────────────────────────

const DEEPSEEK_DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";
const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";
const DEEPSEEK_TEXT_POINTER: &str = "/choices/0/message/content";

const GEMINI_DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";
const GEMINI_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

/// DeepSeek: OpenAI-style chat completions with Bearer auth.
#[derive(Clone, Debug)]
pub struct DeepSeekDescriptor {
    endpoint: Url,
    authorization: String,
    model: String,
    static_headers: Vec<(String, String)>,
}

impl DeepSeekDescriptor {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base = api_base(config, DEEPSEEK_DEFAULT_API_BASE);
        let endpoint = Url::parse(&format!("{base}/chat/completions"))
            .with_context(|| format!("invalid DeepSeek API base: {base}"))?;

        Ok(Self {
            endpoint,
            authorization: format!("Bearer {}", config.api_key),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEEPSEEK_DEFAULT_MODEL.to_string()),
            static_headers: configured_headers(config),
        })
    }

    fn build_request(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": diagram_prompt(prompt) }
            ]
        })
    }
}

/// Gemini: `generateContent` with the key carried in the query string.
#[derive(Clone, Debug)]
pub struct GeminiDescriptor {
    endpoint: Url,
    model: String,
    static_headers: Vec<(String, String)>,
}

impl GeminiDescriptor {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base = api_base(config, GEMINI_DEFAULT_API_BASE);
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| GEMINI_DEFAULT_MODEL.to_string());

        let mut endpoint = Url::parse(&format!("{base}/models/{model}:generateContent"))
            .with_context(|| format!("invalid Gemini API base: {base}"))?;
        endpoint.query_pairs_mut().append_pair("key", &config.api_key);

        let mut static_headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        static_headers.extend(configured_headers(config));

        Ok(Self {
            endpoint,
            model,
            static_headers,
        })
    }

    fn build_request(&self, prompt: &str) -> Value {
        json!({
            "contents": [
                { "parts": [ { "text": diagram_prompt(prompt) } ] }
            ],
            "safetySettings": [
                {
                    "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                    "threshold": "BLOCK_ONLY_HIGH"
                }
            ],
            "generationConfig": {
                "temperature": 0.5,
                "topP": 0.8,
                "topK": 40
            }
        })
    }
}

/// How to call one provider and how to read its response.
///
/// Immutable once built; shared read-only by every request.
#[derive(Clone, Debug)]
pub enum ProviderDescriptor {
    DeepSeek(DeepSeekDescriptor),
    Gemini(GeminiDescriptor),
}

impl ProviderDescriptor {
    /// Build the descriptor for `id` from its provider config.
    pub fn new(id: ProviderId, config: &ProviderConfig) -> Result<Self> {
        Ok(match id {
            ProviderId::DeepSeek => ProviderDescriptor::DeepSeek(DeepSeekDescriptor::new(config)?),
            ProviderId::Gemini => ProviderDescriptor::Gemini(GeminiDescriptor::new(config)?),
        })
    }

    pub fn id(&self) -> ProviderId {
        match self {
            ProviderDescriptor::DeepSeek(_) => ProviderId::DeepSeek,
            ProviderDescriptor::Gemini(_) => ProviderId::Gemini,
        }
    }

    /// Full endpoint URL, credentials included where the provider wants them.
    pub fn endpoint(&self) -> &Url {
        match self {
            ProviderDescriptor::DeepSeek(d) => &d.endpoint,
            ProviderDescriptor::Gemini(g) => &g.endpoint,
        }
    }

    /// Endpoint without query string, safe to log.
    pub fn redacted_endpoint(&self) -> String {
        let mut url = self.endpoint().clone();
        url.set_query(None);
        url.to_string()
    }

    /// Value for the `Authorization` header, if the provider uses one.
    pub fn authorization(&self) -> Option<&str> {
        match self {
            ProviderDescriptor::DeepSeek(d) => Some(&d.authorization),
            ProviderDescriptor::Gemini(_) => None,
        }
    }

    /// Additional headers sent with every request.
    pub fn static_headers(&self) -> &[(String, String)] {
        match self {
            ProviderDescriptor::DeepSeek(d) => &d.static_headers,
            ProviderDescriptor::Gemini(g) => &g.static_headers,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderDescriptor::DeepSeek(d) => &d.model,
            ProviderDescriptor::Gemini(g) => &g.model,
        }
    }

    /// Provider-specific request body for `prompt`. Pure.
    pub fn build_request(&self, prompt: &str) -> Value {
        match self {
            ProviderDescriptor::DeepSeek(d) => d.build_request(prompt),
            ProviderDescriptor::Gemini(g) => g.build_request(prompt),
        }
    }

    /// Locate the generated text inside a provider response. Pure.
    ///
    /// Returns the raw value found there; string-ness is checked by the
    /// sanitizer. A missing path is a [`GenerationError::MalformedResponse`].
    pub fn extract_text<'a>(&self, response: &'a Value) -> Result<&'a Value, GenerationError> {
        let pointer = match self {
            ProviderDescriptor::DeepSeek(_) => DEEPSEEK_TEXT_POINTER,
            ProviderDescriptor::Gemini(_) => GEMINI_TEXT_POINTER,
        };
        response.pointer(pointer).ok_or_else(|| {
            GenerationError::MalformedResponse(format!(
                "{} response has no {}",
                self.id().display_name(),
                pointer
            ))
        })
    }
}

fn api_base<'a>(config: &'a ProviderConfig, default: &'a str) -> &'a str {
    config
        .api_base
        .as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
}

fn configured_headers(config: &ProviderConfig) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = config
        .extra_headers
        .iter()
        .flatten()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    headers.sort();
    headers
}

// ─────────────────────────────────────────────
// ProviderSet
// ─────────────────────────────────────────────

/// Every descriptor, built once at startup.
#[derive(Clone, Debug)]
pub struct ProviderSet {
    descriptors: Vec<ProviderDescriptor>,
}

impl ProviderSet {
    /// Build a descriptor for every [`ProviderId`].
    ///
    /// Missing API keys are not an error here.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let descriptors = ProviderId::ALL
            .iter()
            .map(|id| {
                let provider_config = config.get(id.as_str()).cloned().unwrap_or_default();
                ProviderDescriptor::new(*id, &provider_config)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { descriptors })
    }

    pub fn lookup(&self, id: ProviderId) -> Option<&ProviderDescriptor> {
        self.descriptors.iter().find(|d| d.id() == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.descriptors.iter().map(ProviderDescriptor::id)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
