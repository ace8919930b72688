//! Book aggregate and related types.

mod aggregate;
mod state;
mod value_objects;

pub use aggregate::{Book, BookDraft};
pub use state::LendingState;
pub use value_objects::{Author, Borrower, Isbn, NumberOfPages, Title};

use thiserror::Error;

/// Identifier of a book.
pub type BookId = common::AggregateId;

/// A lending transition that the current state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LendingError {
    /// The book is already lent out.
    #[error("Book {book_id} is already borrowed")]
    AlreadyBorrowed {
        book_id: BookId,
        borrower: Option<Borrower>,
    },

    /// The book is already on the shelf.
    #[error("Book {book_id} was already returned")]
    AlreadyReturned { book_id: BookId },
}

/// A value that failed validation on construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("Malformed ISBN: '{value}' (expected 10 or 13 digits)")]
    MalformedIsbn { value: String },

    #[error("Title must not be blank")]
    BlankTitle,

    #[error("Author name must not be blank")]
    BlankAuthor,

    #[error("Borrower must not be blank")]
    BlankBorrower,

    #[error("Invalid number of pages: {value} (must be greater than 0)")]
    InvalidNumberOfPages { value: u32 },
}
