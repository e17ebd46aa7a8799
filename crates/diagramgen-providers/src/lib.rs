//! Upstream provider layer for Diagramgen.
//!
//! # Architecture
//!
//! - [`registry`] — `ProviderId`, per-provider descriptors, and the `ProviderSet` lookup
//! - [`dispatcher`] — one authenticated POST per request, failures classified at the boundary
//! - [`sanitize`] — strips code fences from generated text
//! - [`service::GenerationService`] — lookup → dispatch → extract → sanitize
//! - [`traits::DiagramGenerator`] — the seam the HTTP layer talks to

pub mod dispatcher;
pub mod error;
pub mod prompt;
pub mod registry;
pub mod sanitize;
pub mod service;
pub mod traits;

// Re-export main types for convenience
pub use error::GenerationError;
pub use registry::{ProviderDescriptor, ProviderId, ProviderSet};
pub use sanitize::{sanitize, sanitize_str};
pub use service::GenerationService;
pub use traits::{DiagramGenerator, GenerationRequest};
