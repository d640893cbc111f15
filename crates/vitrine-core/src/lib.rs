//! Vitrine Core - Foundation crate for the Vitrine product extractor.
//!
//! This crate provides the validated product record, error handling and
//! configuration management that the other Vitrine crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - The validated [`ProductRecord`] and its [`ProductDraft`] input
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::{AppConfig, ProductDraft, ProductRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.site.domain, "panini.com.br");
//!
//! let record = ProductRecord::new(ProductDraft {
//!     title: "Batman: Ano Um".to_string(),
//!     full_price: 59.9,
//!     current_price: 49.9,
//!     source_url: "https://panini.com.br/batman-ano-um".to_string(),
//!     id: "AHQBA001".to_string(),
//!     ..ProductDraft::default()
//! })?;
//! assert_eq!(record.current_price(), 49.9);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, HttpConfig, ProxyAuth, ProxyConfig, SiteConfig};
pub use error::{ConfigError, ConfigResult, Result, VitrineError};
pub use types::{ProductDraft, ProductRecord, FORMAT_UNSPECIFIED};
