//! Sweeper Scanner - content search and markup audit.
//!
//! This crate searches structured CMS records for a term and audits them for
//! residual formatting debris pasted in from office suites, design tools and
//! rich text editors. Records are fetched per scope through a
//! [`ContentSource`], walked to every string and scalar leaf, and matched on
//! normalized, case-folded text.
//!
//! # Features
//!
//! - Concurrent scope fetches with configurable parallelism and partial failure
//! - HTML entity and Unicode punctuation normalization before matching
//! - Context snippets with per-path occurrence counts
//! - Generic/specific pattern de-duplication for audits
//! - Cycle and depth guards on record traversal
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sweeper_core::AppConfig;
//! use sweeper_scanner::{ContentScanner, ScopeRequest};
//!
//! let config = AppConfig::load_with_env()?;
//! let scanner = ContentScanner::new(Arc::new(source), &config);
//!
//! let request = ScopeRequest::from_config(&config.source)
//!     .with_page_type("landing")
//!     .with_blog();
//!
//! let search = scanner.search("Acme Corp", &request, false).await;
//! let audit = scanner.audit(&request).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalog;
pub mod dedup;
#[allow(missing_docs)]
pub mod error;
pub mod locate;
pub mod normalize;
pub mod orchestrator;
pub mod response;
pub mod scope;
pub mod source;
pub mod walker;

// Re-export commonly used types
pub use catalog::{Pattern, PatternCatalog, BUILTIN_PATTERNS};
pub use dedup::{audit_record, PatternMatch};
pub use error::{Result, ScanError};
pub use locate::{locate, SnippetLimits, Target};
pub use normalize::normalize;
pub use orchestrator::ContentScanner;
pub use response::{
    AuditFinding, AuditIssue, AuditResponse, SearchMatch, SearchResponse, SearchResult,
};
pub use scope::ScopeRequest;
pub use source::{fetch_scope, ContentSource};
pub use walker::{walk, Exclusions, MatchAccumulator, Path, WalkLimits, WalkMatches};
