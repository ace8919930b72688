//! Collection service orchestrating book operations.

use chrono::{DateTime, Utc};
use common::Clock;
use data_store::DataStore;

use crate::book::{Author, Book, BookDraft, BookId, Borrower, NumberOfPages, Title};
use crate::error::DomainError;
use crate::events::{DomainEvent, EventDispatcher, EventType};
use crate::id_generator::IdGenerator;

/// Service for managing the book collection.
///
/// Every mutating operation follows the same sequence: load (or create) the
/// aggregate, apply the pure mutation, persist it, then dispatch exactly one
/// event. Any failure aborts the sequence, so an event is only ever dispatched
/// for state that has been committed.
pub struct CollectionService<S, D, C> {
    store: S,
    dispatcher: D,
    clock: C,
    ids: IdGenerator<S>,
}

impl<S, D, C> CollectionService<S, D, C>
where
    S: DataStore<Book> + Clone,
    D: EventDispatcher,
    C: Clock,
{
    /// Creates a new collection service.
    pub fn new(store: S, dispatcher: D, clock: C) -> Self {
        Self {
            ids: IdGenerator::new(store.clone()),
            store,
            dispatcher,
            clock,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a new book to the collection. New books are always available.
    #[tracing::instrument(skip(self, draft), fields(isbn = %draft.isbn), err(level = "warn"))]
    pub async fn add_book(&self, draft: BookDraft) -> Result<Book, DomainError> {
        let id = self.ids.generate().await?;
        let book = self
            .commit(Book::new(id, draft), EventType::BookAdded, self.clock.now())
            .await?;

        metrics::counter!("library_books_added_total").increment(1);
        tracing::info!(book_id = %book.id(), title = %book.title(), "book added");
        Ok(book)
    }

    /// Loads a book by ID.
    #[tracing::instrument(skip(self), err(level = "debug"))]
    pub async fn get_book(&self, id: BookId) -> Result<Book, DomainError> {
        self.load(id).await
    }

    /// Loads every book in the collection, oldest first.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn get_all_books(&self) -> Result<Vec<Book>, DomainError> {
        Ok(self.store.find_all().await?)
    }

    /// Removes a book from the collection.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn remove_book(&self, id: BookId) -> Result<(), DomainError> {
        let book = self.load(id).await?;
        self.store.delete(&book).await?;
        self.publish(EventType::BookRemoved, id, self.clock.now())
            .await?;

        metrics::counter!("library_books_removed_total").increment(1);
        tracing::info!(book_id = %id, "book removed");
        Ok(())
    }

    /// Applies a pure mutation to the descriptive fields of a book.
    ///
    /// The mutation must not change the book's identity; if it does, nothing is
    /// stored or dispatched and [`DomainError::IdentityChanged`] is returned.
    /// Use [`borrow_book`](Self::borrow_book) and
    /// [`return_book`](Self::return_book) for lending changes.
    #[tracing::instrument(skip(self, mutator), err(level = "warn"))]
    pub async fn update_book<F>(&self, id: BookId, mutator: F) -> Result<Book, DomainError>
    where
        F: FnOnce(Book) -> Book + Send,
    {
        let book = mutator(self.load(id).await?);
        if book.id() != id {
            return Err(DomainError::IdentityChanged {
                expected: id,
                found: book.id(),
            });
        }
        let book = self
            .commit(book, EventType::BookUpdated, self.clock.now())
            .await?;

        metrics::counter!("library_books_updated_total").increment(1);
        tracing::info!(book_id = %id, "book updated");
        Ok(book)
    }

    /// Lends a book to `borrower`.
    ///
    /// Fails with a conflict if the book is already borrowed.
    #[tracing::instrument(skip(self, borrower), fields(borrower = %borrower), err(level = "warn"))]
    pub async fn borrow_book(&self, id: BookId, borrower: Borrower) -> Result<Book, DomainError> {
        let now = self.clock.now();
        let book = self.load(id).await?.borrow(borrower, now)?;
        let book = self.commit(book, EventType::BookBorrowed, now).await?;

        metrics::counter!("library_books_borrowed_total").increment(1);
        tracing::info!(book_id = %id, "book borrowed");
        Ok(book)
    }

    /// Puts a borrowed book back on the shelf.
    ///
    /// Fails with a conflict if the book is not borrowed.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn return_book(&self, id: BookId) -> Result<Book, DomainError> {
        let book = self.load(id).await?.return_book()?;
        let book = self
            .commit(book, EventType::BookReturned, self.clock.now())
            .await?;

        metrics::counter!("library_books_returned_total").increment(1);
        tracing::info!(book_id = %id, "book returned");
        Ok(book)
    }

    // Convenience updates

    /// Replaces the title of a book.
    pub async fn update_title(&self, id: BookId, title: Title) -> Result<Book, DomainError> {
        self.update_book(id, |book| book.with_title(title)).await
    }

    /// Replaces the authors of a book.
    pub async fn update_authors(
        &self,
        id: BookId,
        authors: Vec<Author>,
    ) -> Result<Book, DomainError> {
        self.update_book(id, |book| book.with_authors(authors))
            .await
    }

    /// Replaces the page count of a book.
    pub async fn update_number_of_pages(
        &self,
        id: BookId,
        pages: NumberOfPages,
    ) -> Result<Book, DomainError> {
        self.update_book(id, |book| book.with_number_of_pages(pages))
            .await
    }

    /// Clears the authors of a book.
    pub async fn remove_authors(&self, id: BookId) -> Result<Book, DomainError> {
        self.update_book(id, Book::without_authors).await
    }

    /// Clears the page count of a book.
    pub async fn remove_number_of_pages(&self, id: BookId) -> Result<Book, DomainError> {
        self.update_book(id, Book::without_number_of_pages).await
    }

    async fn load(&self, id: BookId) -> Result<Book, DomainError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(id))
    }

    /// Persists `book` and, once stored, dispatches the matching event stamped `at`.
    async fn commit(
        &self,
        book: Book,
        event_type: EventType,
        at: DateTime<Utc>,
    ) -> Result<Book, DomainError> {
        let stored = self.store.create_or_update(book).await?;
        self.publish(event_type, stored.id(), at).await?;
        Ok(stored)
    }

    async fn publish(
        &self,
        event_type: EventType,
        book_id: BookId,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let event = DomainEvent::new(event_type, book_id, at);
        tracing::debug!(event_id = %event.event_id, event_type = %event_type, "dispatching event");
        self.dispatcher.dispatch(event).await?;
        Ok(())
    }
}
