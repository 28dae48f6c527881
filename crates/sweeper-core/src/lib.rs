//! Sweeper Core - Foundation crate for the sweeper content scanner.
//!
//! This crate provides the shared record model, scope identifiers, error
//! handling and configuration management that the scanner depends on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Scope newtypes and enums (`PageType`, `CollectionKey`, `Scope`)
//! - [`record`] - Arena-backed record trees with node identity
//!
//! # Example
//!
//! ```rust
//! use sweeper_core::{AppConfig, Record};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.scanning.max_depth, 10);
//!
//! let record = Record::from_json(&serde_json::json!({"slug": "home", "name": "Home"}));
//! assert_eq!(record.title(), "Home");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod record;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, ScanningConfig, SourceConfig};
pub use error::{ConfigError, ConfigResult, Result, SweeperError};
pub use record::{Node, NodeId, Record};
pub use types::{CollectionKey, PageType, Scope};
