//! Enrichment worker reacting to newly added books.

use std::sync::Arc;

use common::{Clock, CorrelationId};
use data_store::DataStore;
use dispatch::CorrelatingDispatcher;
use domain::{Book, BookId, CollectionService, DomainError, DomainEvent, EventDispatcher, EventType};
use futures_util::future::join_all;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::Result;
use crate::merge::merge;
use crate::sources::{BookData, BookDataSource};

/// Looks up newly added books in external sources and applies what they know.
///
/// Updates go through a collection service built for each book, whose
/// dispatcher stamps the triggering event's correlation id, so the resulting
/// `BookUpdated` event belongs to the same logical request as the `BookAdded`
/// that caused it.
pub struct BookEnricher<S, D, C> {
    store: S,
    dispatcher: D,
    clock: C,
    sources: Vec<Arc<dyn BookDataSource>>,
}

impl<S, D, C> BookEnricher<S, D, C>
where
    S: DataStore<Book> + Clone + 'static,
    D: EventDispatcher + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Creates an enricher with no sources.
    pub fn new(store: S, dispatcher: D, clock: C) -> Self {
        Self {
            store,
            dispatcher,
            clock,
            sources: Vec::new(),
        }
    }

    /// Adds a source. Sources are consulted in the order they were added.
    pub fn with_source(mut self, source: Arc<dyn BookDataSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Returns the number of configured sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Handles one event. Only `BookAdded` triggers a lookup.
    pub async fn handle(&self, event: &DomainEvent) -> Result<Option<Book>> {
        if event.event_type != EventType::BookAdded {
            return Ok(None);
        }
        let correlation_id = event
            .correlation_id
            .clone()
            .unwrap_or_else(CorrelationId::generate);
        self.enrich(event.book_id, correlation_id).await
    }

    /// Looks the book up in every source and applies the merged result.
    ///
    /// Returns the updated book, or `None` if no source had anything usable.
    #[tracing::instrument(skip(self, correlation_id), fields(correlation_id = %correlation_id))]
    pub async fn enrich(
        &self,
        book_id: BookId,
        correlation_id: CorrelationId,
    ) -> Result<Option<Book>> {
        let service = CollectionService::new(
            self.store.clone(),
            CorrelatingDispatcher::new(self.dispatcher.clone(), correlation_id),
            self.clock.clone(),
        );

        let book = service.get_book(book_id).await?;
        let answers = self.lookup_all(&book).await;

        let Some(enrichment) = merge(answers) else {
            tracing::debug!(isbn = %book.isbn(), "no source had usable data");
            return Ok(None);
        };

        let updated = service
            .update_book(book_id, |book| enrichment.apply(book))
            .await?;

        metrics::counter!("library_enrichment_applied_total").increment(1);
        tracing::info!(isbn = %updated.isbn(), "book enriched");
        Ok(Some(updated))
    }

    /// Queries all sources concurrently, keeping answers in priority order.
    async fn lookup_all(&self, book: &Book) -> Vec<Option<BookData>> {
        let isbn = book.isbn();
        let lookups = self.sources.iter().map(|source| async move {
            match source.lookup(isbn).await {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "data source lookup failed");
                    None
                }
            }
        });
        join_all(lookups).await
    }

    /// Consumes events until the channel closes.
    pub async fn run(self, mut events: broadcast::Receiver<DomainEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => match self.handle(&event).await {
                    Ok(_) => {}
                    // Removed before we got to it.
                    Err(crate::EnrichmentError::Domain(DomainError::NotFound(id))) => {
                        tracing::debug!(book_id = %id, "book gone before enrichment");
                    }
                    Err(e) => {
                        tracing::warn!(book_id = %event.book_id, error = %e, "enrichment failed");
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "enrichment fell behind, events skipped");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::info!("enrichment worker stopped");
    }

    /// Runs [`run`](Self::run) on a new task.
    pub fn spawn(self, events: broadcast::Receiver<DomainEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryBookDataSource;
    use common::SystemClock;
    use data_store::InMemoryDataStore;
    use dispatch::RecordingDispatcher;
    use domain::{BookDraft, Isbn, NumberOfPages, Title};

    type TestEnricher =
        BookEnricher<InMemoryDataStore<Book>, RecordingDispatcher, SystemClock>;

    fn isbn() -> Isbn {
        Isbn::parse("9780553573404").unwrap()
    }

    async fn setup(
        sources: Vec<InMemoryBookDataSource>,
    ) -> (TestEnricher, RecordingDispatcher, BookId) {
        let store = InMemoryDataStore::new();
        let dispatcher = RecordingDispatcher::new();
        let service = CollectionService::new(store.clone(), dispatcher.clone(), SystemClock);
        let id = service
            .add_book(BookDraft::new(
                isbn(),
                Title::new("A Game of Thrones").unwrap(),
            ))
            .await
            .unwrap()
            .id();
        dispatcher.clear().await;

        let mut enricher = BookEnricher::new(store, dispatcher.clone(), SystemClock);
        for source in sources {
            enricher = enricher.with_source(Arc::new(source));
        }
        (enricher, dispatcher, id)
    }

    #[tokio::test]
    async fn test_applies_merged_data() {
        let open_library = InMemoryBookDataSource::new("open-library")
            .with_book(isbn(), BookData::new().with_authors(["George R. R. Martin"]));
        let isbndb = InMemoryBookDataSource::new("isbndb").with_book(
            isbn(),
            BookData::new()
                .with_authors(["GRRM"])
                .with_number_of_pages(835),
        );
        let (enricher, dispatcher, id) = setup(vec![open_library, isbndb]).await;
        let correlation = CorrelationId::parse("req-1").unwrap();

        let book = enricher.enrich(id, correlation.clone()).await.unwrap().unwrap();

        assert_eq!(book.authors()[0].as_str(), "George R. R. Martin");
        assert_eq!(book.number_of_pages(), Some(NumberOfPages::new(835).unwrap()));
        let events = dispatcher.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::BookUpdated);
        assert_eq!(events[0].correlation_id, Some(correlation));
    }

    #[tokio::test]
    async fn test_failing_source_counts_as_absent() {
        let open_library = InMemoryBookDataSource::new("open-library");
        open_library.set_fail_on_lookup(true);
        let isbndb = InMemoryBookDataSource::new("isbndb")
            .with_book(isbn(), BookData::new().with_number_of_pages(835));
        let (enricher, _, id) = setup(vec![open_library.clone(), isbndb]).await;

        let book = enricher
            .enrich(id, CorrelationId::generate())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(open_library.lookup_count(), 1);
        assert!(book.authors().is_empty());
        assert_eq!(book.number_of_pages().map(|p| p.get()), Some(835));
    }

    #[tokio::test]
    async fn test_nothing_usable_means_no_update() {
        let (enricher, dispatcher, id) =
            setup(vec![InMemoryBookDataSource::new("open-library")]).await;

        let result = enricher.enrich(id, CorrelationId::generate()).await.unwrap();

        assert!(result.is_none());
        assert!(dispatcher.is_empty().await);
    }

    #[tokio::test]
    async fn test_only_book_added_triggers_lookup() {
        let source = InMemoryBookDataSource::new("open-library");
        let (enricher, _, id) = setup(vec![source.clone()]).await;

        let event = DomainEvent::new(EventType::BookBorrowed, id, SystemClock.now());
        assert!(enricher.handle(&event).await.unwrap().is_none());
        assert_eq!(source.lookup_count(), 0);

        let event = DomainEvent::new(EventType::BookAdded, id, SystemClock.now());
        enricher.handle(&event).await.unwrap();
        assert_eq!(source.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_book_is_not_found() {
        let (enricher, _, _) = setup(vec![]).await;

        let result = enricher.enrich(BookId::new(), CorrelationId::generate()).await;

        assert!(matches!(
            result,
            Err(crate::EnrichmentError::Domain(DomainError::NotFound(_)))
        ));
    }
}
