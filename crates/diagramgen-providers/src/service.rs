//! Generation service — resolves the provider, calls it once, and cleans
//! up whatever comes back.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error, info};

use diagramgen_core::config::ProvidersConfig;
use diagramgen_core::utils::truncate_string;

use crate::dispatcher::dispatch;
use crate::error::GenerationError;
use crate::registry::{ProviderDescriptor, ProviderId, ProviderSet};
use crate::sanitize::sanitize;
use crate::traits::{DiagramGenerator, GenerationRequest};

/// Longest request/response excerpt written to the log.
const LOG_EXCERPT_CHARS: usize = 2000;

/// Live generator backed by the upstream providers.
///
/// Holds read-only state only, so one instance is shared by every
/// concurrent request.
#[derive(Clone, Debug)]
pub struct GenerationService {
    /// HTTP client (shared, connection-pooled, transport default timeouts).
    client: reqwest::Client,
    providers: ProviderSet,
}

impl GenerationService {
    /// Build every provider descriptor and the shared HTTP client.
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        let providers = ProviderSet::from_config(config)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("diagramgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        for id in providers.ids() {
            let configured = config.get(id.as_str()).is_some_and(|c| c.is_configured());
            info!(provider = id.as_str(), configured, "Provider registered");
        }

        Ok(Self::with_client(client, providers))
    }

    /// Assemble a service from existing parts.
    pub fn with_client(client: reqwest::Client, providers: ProviderSet) -> Self {
        Self { client, providers }
    }

    async fn run(
        &self,
        descriptor: &ProviderDescriptor,
        prompt: &str,
    ) -> Result<String, GenerationError> {
        let response = dispatch(&self.client, descriptor, prompt).await?;

        let raw = descriptor.extract_text(&response)?;
        debug!(
            provider = descriptor.id().as_str(),
            raw = %truncate_string(&raw.to_string(), LOG_EXCERPT_CHARS),
            "Extracted generated text"
        );

        sanitize(raw)
    }
}

#[async_trait]
impl DiagramGenerator for GenerationService {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let descriptor = self
            .providers
            .lookup(request.provider)
            .ok_or_else(|| GenerationError::UnknownProvider(request.provider.to_string()))?;

        match self.run(descriptor, &request.prompt).await {
            Ok(code) => {
                info!(
                    provider = descriptor.id().as_str(),
                    chars = code.len(),
                    "Diagram generated"
                );
                Ok(code)
            }
            Err(e) => {
                let request_body = descriptor.build_request(&request.prompt).to_string();
                error!(
                    provider = descriptor.id().as_str(),
                    url = %descriptor.redacted_endpoint(),
                    request_body = %truncate_string(&request_body, LOG_EXCERPT_CHARS),
                    status = ?e.upstream_status(),
                    details = %e.details(),
                    error = %e,
                    "Diagram generation failed"
                );
                Err(e)
            }
        }
    }

    fn providers(&self) -> Vec<ProviderId> {
        self.providers.ids().collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
