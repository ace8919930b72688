//! Book aggregate implementation.

use chrono::{DateTime, Utc};
use data_store::Document;
use serde::{Deserialize, Serialize};

use super::{Author, Borrower, BookId, Isbn, LendingError, LendingState, NumberOfPages, Title};

/// Everything needed to add a book to the collection, minus its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub isbn: Isbn,
    pub title: Title,
    pub authors: Vec<Author>,
    pub number_of_pages: Option<NumberOfPages>,
}

impl BookDraft {
    /// Creates a draft without authors or page count.
    pub fn new(isbn: Isbn, title: Title) -> Self {
        Self {
            isbn,
            title,
            authors: Vec::new(),
            number_of_pages: None,
        }
    }

    pub fn with_authors(mut self, authors: Vec<Author>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_number_of_pages(mut self, pages: NumberOfPages) -> Self {
        self.number_of_pages = Some(pages);
        self
    }
}

/// Book aggregate root.
///
/// A book's identity never changes. Its lending state only moves through
/// [`Book::borrow`] and [`Book::return_book`]; its descriptive fields only
/// through the `with_*`/`without_*` transformations. All of them are pure and
/// hand back a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    isbn: Isbn,
    title: Title,
    #[serde(default)]
    authors: Vec<Author>,
    #[serde(default)]
    number_of_pages: Option<NumberOfPages>,
    #[serde(default)]
    lending_state: LendingState,
}

impl Document for Book {
    fn collection() -> &'static str {
        "books"
    }

    fn document_id(&self) -> BookId {
        self.id
    }
}

// Query methods
impl Book {
    /// Creates a book from a draft. New books are always available.
    pub fn new(id: BookId, draft: BookDraft) -> Self {
        Self {
            id,
            isbn: draft.isbn,
            title: draft.title,
            authors: draft.authors,
            number_of_pages: draft.number_of_pages,
            lending_state: LendingState::Available,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the authors in their original order.
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn number_of_pages(&self) -> Option<NumberOfPages> {
        self.number_of_pages
    }

    pub fn lending_state(&self) -> &LendingState {
        &self.lending_state
    }

    /// Returns true if the book is on the shelf.
    pub fn is_available(&self) -> bool {
        self.lending_state.can_borrow()
    }
}

// Lending transitions
impl Book {
    /// Lends the book to `borrower` at `at`.
    ///
    /// Fails with [`LendingError::AlreadyBorrowed`] if it is already lent out.
    pub fn borrow(&self, borrower: Borrower, at: DateTime<Utc>) -> Result<Book, LendingError> {
        if !self.lending_state.can_borrow() {
            return Err(LendingError::AlreadyBorrowed {
                book_id: self.id,
                borrower: self.lending_state.borrower().cloned(),
            });
        }

        Ok(Book {
            lending_state: LendingState::Borrowed {
                borrower,
                borrowed_at: at,
            },
            ..self.clone()
        })
    }

    /// Puts the book back on the shelf.
    ///
    /// Fails with [`LendingError::AlreadyReturned`] if it is not lent out.
    pub fn return_book(&self) -> Result<Book, LendingError> {
        if !self.lending_state.can_return() {
            return Err(LendingError::AlreadyReturned { book_id: self.id });
        }

        Ok(Book {
            lending_state: LendingState::Available,
            ..self.clone()
        })
    }
}

// Descriptive updates
impl Book {
    pub fn with_title(self, title: Title) -> Book {
        Book { title, ..self }
    }

    pub fn with_authors(self, authors: Vec<Author>) -> Book {
        Book { authors, ..self }
    }

    pub fn without_authors(self) -> Book {
        Book {
            authors: Vec::new(),
            ..self
        }
    }

    pub fn with_number_of_pages(self, pages: NumberOfPages) -> Book {
        Book {
            number_of_pages: Some(pages),
            ..self
        }
    }

    pub fn without_number_of_pages(self) -> Book {
        Book {
            number_of_pages: None,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn game_of_thrones() -> Book {
        let draft = BookDraft::new(
            Isbn::parse("9780553573404").unwrap(),
            Title::new("A Game of Thrones").unwrap(),
        )
        .with_authors(Author::list(["George R. R. Martin"]).unwrap())
        .with_number_of_pages(NumberOfPages::new(835).unwrap());
        Book::new(BookId::new(), draft)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn rob() -> Borrower {
        Borrower::new("Rob Stark").unwrap()
    }

    #[test]
    fn new_book_is_available() {
        let book = game_of_thrones();
        assert!(book.is_available());
        assert_eq!(book.lending_state(), &LendingState::Available);
        assert_eq!(book.authors()[0].as_str(), "George R. R. Martin");
        assert_eq!(book.number_of_pages().map(|p| p.get()), Some(835));
    }

    #[test]
    fn borrow_moves_to_borrowed() {
        let book = game_of_thrones();
        let borrowed = book.borrow(rob(), noon()).unwrap();

        assert_eq!(
            borrowed.lending_state(),
            &LendingState::Borrowed {
                borrower: rob(),
                borrowed_at: noon(),
            }
        );
        assert_eq!(borrowed.id(), book.id());
        // The original value is untouched.
        assert!(book.is_available());
    }

    #[test]
    fn borrowing_twice_fails() {
        let borrowed = game_of_thrones().borrow(rob(), noon()).unwrap();
        let err = borrowed
            .borrow(Borrower::new("Arya Stark").unwrap(), noon())
            .unwrap_err();

        match err {
            LendingError::AlreadyBorrowed { book_id, borrower } => {
                assert_eq!(book_id, borrowed.id());
                assert_eq!(borrower, Some(rob()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn returning_twice_fails() {
        let returned = game_of_thrones()
            .borrow(rob(), noon())
            .unwrap()
            .return_book()
            .unwrap();
        let err = returned.return_book().unwrap_err();
        assert!(matches!(
            err,
            LendingError::AlreadyReturned { book_id } if book_id == returned.id()
        ));
    }

    #[test]
    fn borrow_then_return_restores_original() {
        let book = game_of_thrones();
        let round_trip = book
            .borrow(rob(), noon())
            .unwrap()
            .return_book()
            .unwrap();
        assert_eq!(round_trip, book);
    }

    #[test]
    fn lending_cycles_indefinitely() {
        let mut book = game_of_thrones();
        for day in 0..3 {
            book = book
                .borrow(rob(), noon() + Duration::days(day))
                .unwrap()
                .return_book()
                .unwrap();
        }
        assert!(book.is_available());
    }

    #[test]
    fn descriptive_updates_keep_identity_and_lending_state() {
        let book = game_of_thrones().borrow(rob(), noon()).unwrap();
        let id = book.id();

        let updated = book
            .with_title(Title::new("A Clash of Kings").unwrap())
            .without_authors()
            .without_number_of_pages();

        assert_eq!(updated.id(), id);
        assert_eq!(updated.title().as_str(), "A Clash of Kings");
        assert!(updated.authors().is_empty());
        assert!(updated.number_of_pages().is_none());
        assert!(!updated.is_available());
    }

    #[test]
    fn serialization_roundtrip_keeps_lending_state() {
        let book = game_of_thrones().borrow(rob(), noon()).unwrap();
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["isbn"], "9780553573404");
        assert_eq!(json["lending_state"]["status"], "BORROWED");

        let restored: Book = serde_json::from_value(json).unwrap();
        assert_eq!(restored, book);
    }

    #[test]
    fn document_key_is_the_book_id() {
        let book = game_of_thrones();
        assert_eq!(book.document_id(), book.id());
        assert_eq!(Book::collection(), "books");
    }
}
