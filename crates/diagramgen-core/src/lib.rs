//! Core building blocks for Diagramgen.
//!
//! - [`config`] — typed configuration, file loading, environment overrides
//! - [`types`] — JSON bodies exchanged over the HTTP surface
//! - [`utils`] — data-directory paths and small string helpers

pub mod config;
pub mod types;
pub mod utils;
