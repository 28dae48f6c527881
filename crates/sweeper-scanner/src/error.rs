use sweeper_core::SweeperError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No content scope selected. Select at least one page type, collection, or the blog.")]
    NoScopeSelected,

    #[error("Content source token is required")]
    MissingToken,

    #[error("Invalid scope selection: {reason}")]
    InvalidScope { reason: String },

    #[error("Failed to fetch {scope}: {message}")]
    ScopeFailed { scope: String, message: String },

    #[error("Failed to fetch content from every selected scope ({})", failed_scopes.join(", "))]
    AllScopesFailed { failed_scopes: Vec<String> },

    #[error("Scan cancelled")]
    Cancelled,

    #[error(transparent)]
    Core(#[from] SweeperError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
