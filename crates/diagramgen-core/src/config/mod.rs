//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use diagramgen_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Port: {}", cfg.server.port);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_config, load_dotenv, save_config};
pub use schema::{Config, ProviderConfig, ProvidersConfig, ServerConfig};
