//! Diagram generator trait — the seam between the HTTP layer and upstreams.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::registry::ProviderId;

/// One diagram request. Transient; nothing about it is stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Free-text description of the wanted diagram.
    pub prompt: String,
    pub provider: ProviderId,
}

impl GenerationRequest {
    pub fn new(provider: ProviderId, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            provider,
        }
    }
}

/// Anything that can turn a [`GenerationRequest`] into diagram source.
///
/// The main implementation is [`GenerationService`](crate::GenerationService).
#[async_trait]
pub trait DiagramGenerator: Send + Sync {
    /// Produce sanitized diagram source, or the reason there is none.
    ///
    /// Single attempt: implementations must not retry.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Providers this generator can serve.
    fn providers(&self) -> Vec<ProviderId>;
}
