//! Lending state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Borrower;

/// Whether a book is on the shelf or lent out.
///
/// State transitions:
/// ```text
///             borrow
/// Available ─────────► Borrowed
///     ▲                   │
///     └───────────────────┘
///             return
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LendingState {
    /// The book can be borrowed.
    #[default]
    Available,

    /// The book is lent out.
    Borrowed {
        borrower: Borrower,
        borrowed_at: DateTime<Utc>,
    },
}

impl LendingState {
    /// Returns true if the book can be borrowed in this state.
    pub fn can_borrow(&self) -> bool {
        matches!(self, LendingState::Available)
    }

    /// Returns true if the book can be returned in this state.
    pub fn can_return(&self) -> bool {
        matches!(self, LendingState::Borrowed { .. })
    }

    /// Returns the current borrower, if any.
    pub fn borrower(&self) -> Option<&Borrower> {
        match self {
            LendingState::Available => None,
            LendingState::Borrowed { borrower, .. } => Some(borrower),
        }
    }

    /// Returns when the book was borrowed, if it is.
    pub fn borrowed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            LendingState::Available => None,
            LendingState::Borrowed { borrowed_at, .. } => Some(*borrowed_at),
        }
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LendingState::Available => "Available",
            LendingState::Borrowed { .. } => "Borrowed",
        }
    }
}

impl std::fmt::Display for LendingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
