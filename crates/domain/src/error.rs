//! Domain error types.

use data_store::StoreError;
use thiserror::Error;

use crate::book::{BookId, LendingError, ValueError};

/// Errors that can occur during collection operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No book is stored under this id.
    #[error("Book not found: {0}")]
    NotFound(BookId),

    /// An update tried to give a book a different id.
    #[error("Update of book {expected} changed its id to {found}")]
    IdentityChanged { expected: BookId, found: BookId },

    /// The lending state machine rejected the operation.
    #[error(transparent)]
    Lending(#[from] LendingError),

    /// A value failed validation.
    #[error("Malformed value: {0}")]
    MalformedValue(#[from] ValueError),

    /// The data store failed.
    #[error("Data store error: {0}")]
    Store(#[from] StoreError),

    /// The event dispatcher failed.
    #[error("Event dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Coarse classification of a [`DomainError`], for mapping onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    MalformedValue,
    Infrastructure,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Lending(_) => ErrorKind::Conflict,
            DomainError::MalformedValue(_) | DomainError::IdentityChanged { .. } => {
                ErrorKind::MalformedValue
            }
            DomainError::Store(_) | DomainError::Dispatch(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Errors raised by an event dispatcher adapter.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The dispatcher can no longer accept events.
    #[error("Dispatcher closed")]
    Closed,

    /// The dispatcher refused or failed to accept the event.
    #[error("Dispatch failed: {0}")]
    Failed(String),
}
