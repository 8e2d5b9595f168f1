use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Circuit open: failing fast without contacting the catalog service")]
    BreakerOpen,

    #[error("Catalog service unavailable (status {status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("Catalog service rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl CatalogError {
    /// Retry-eligible at the client layer, safe to redeliver at the event
    /// layer. A breaker fast-fail is indistinguishable in class from a
    /// timed-out call.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CatalogError::Network(_)
                | CatalogError::Timeout(_)
                | CatalogError::BreakerOpen
                | CatalogError::Unavailable { .. }
        )
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(err.to_string())
    }
}
