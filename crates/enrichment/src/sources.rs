//! Book data source trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Isbn;

use crate::error::EnrichmentError;

/// What one external source knows about a book.
///
/// The data is taken as the source reports it; blank author names and a
/// zero page count are possible and are dealt with when merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookData {
    pub authors: Vec<String>,
    pub number_of_pages: Option<u32>,
}

impl BookData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_number_of_pages(mut self, pages: u32) -> Self {
        self.number_of_pages = Some(pages);
        self
    }
}

/// Trait for external book data lookups (OpenLibrary, ISBNdb and the like).
#[async_trait]
pub trait BookDataSource: Send + Sync {
    /// Returns the name of this source, used in logs.
    fn name(&self) -> &'static str;

    /// Looks up a book by ISBN. `None` means the source does not know it.
    async fn lookup(&self, isbn: &Isbn) -> Result<Option<BookData>, EnrichmentError>;
}

#[derive(Debug, Default)]
struct InMemorySourceState {
    books: HashMap<Isbn, BookData>,
    lookups: usize,
    fail_on_lookup: bool,
}

/// In-memory book data source for testing and local runs.
#[derive(Debug, Clone)]
pub struct InMemoryBookDataSource {
    name: &'static str,
    state: Arc<RwLock<InMemorySourceState>>,
}

impl InMemoryBookDataSource {
    /// Creates an empty source with the given name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(RwLock::new(InMemorySourceState::default())),
        }
    }

    /// Adds or replaces the data known for `isbn`.
    pub fn insert(&self, isbn: Isbn, data: BookData) {
        self.write().books.insert(isbn, data);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_book(self, isbn: Isbn, data: BookData) -> Self {
        self.insert(isbn, data);
        self
    }

    /// Configures the source to fail every lookup.
    pub fn set_fail_on_lookup(&self, fail: bool) {
        self.write().fail_on_lookup = fail;
    }

    /// Returns how many lookups were attempted.
    pub fn lookup_count(&self) -> usize {
        self.read().lookups
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InMemorySourceState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemorySourceState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BookDataSource for InMemoryBookDataSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn lookup(&self, isbn: &Isbn) -> Result<Option<BookData>, EnrichmentError> {
        let mut state = self.write();
        state.lookups += 1;

        if state.fail_on_lookup {
            return Err(EnrichmentError::Source {
                source_name: self.name,
                reason: "service unavailable".to_string(),
            });
        }

        Ok(state.books.get(isbn).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isbn() -> Isbn {
        Isbn::parse("9780553573404").unwrap()
    }

    #[tokio::test]
    async fn test_lookup_known_and_unknown() {
        let source = InMemoryBookDataSource::new("open-library").with_book(
            isbn(),
            BookData::new()
                .with_authors(["George R. R. Martin"])
                .with_number_of_pages(835),
        );

        let found = source.lookup(&isbn()).await.unwrap().unwrap();
        assert_eq!(found.authors, vec!["George R. R. Martin".to_string()]);
        assert_eq!(found.number_of_pages, Some(835));

        let unknown = Isbn::parse("0000000000").unwrap();
        assert!(source.lookup(&unknown).await.unwrap().is_none());
        assert_eq!(source.lookup_count(), 2);
    }

    #[tokio::test]
    async fn test_fail_on_lookup() {
        let source = InMemoryBookDataSource::new("isbndb");
        source.set_fail_on_lookup(true);

        let result = source.lookup(&isbn()).await;

        assert!(matches!(
            result,
            Err(EnrichmentError::Source {
                source_name: "isbndb",
                ..
            })
        ));
    }
}
