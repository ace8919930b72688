use thiserror::Error;

/// Errors that can occur when interacting with a data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored document could not be converted to or from JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store could not serve the request at all.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for data store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
