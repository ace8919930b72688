//! Listener error types.

use thiserror::Error;

/// Errors that can occur while a listener handles an event.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The notifier could not deliver a message.
    #[error("Notification failed: {0}")]
    Notification(String),

    /// A listener-specific error.
    #[error("Listener error: {0}")]
    Listener(String),
}

/// Result type for listener operations.
pub type Result<T> = std::result::Result<T, ListenerError>;
