//! Enrichment error types.

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur during enrichment.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// A data source could not answer.
    #[error("Data source '{source_name}' failed: {reason}")]
    Source {
        source_name: &'static str,
        reason: String,
    },

    /// Loading or updating the book failed.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Convenience type alias for enrichment results.
pub type Result<T> = std::result::Result<T, EnrichmentError>;
