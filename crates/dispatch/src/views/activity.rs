//! Lending activity read model: per-book event history and current loans.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::CorrelationId;
use domain::{BookId, DomainEvent, EventType};
use tokio::sync::RwLock;

use crate::Result;
use crate::listener::EventListener;

/// One event in a book's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<CorrelationId>,
}

#[derive(Default)]
struct ActivityState {
    history: HashMap<BookId, Vec<ActivityEntry>>,
    borrowed: BTreeSet<BookId>,
    events_processed: u64,
}

/// Read model view of lending activity.
///
/// Keeps every event seen for each book, and the set of books currently lent
/// out. History survives removal of the book; the loan does not.
#[derive(Clone, Default)]
pub struct LendingActivityView {
    state: Arc<RwLock<ActivityState>>,
}

impl LendingActivityView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the event history of a book, oldest first.
    pub async fn history(&self, book_id: BookId) -> Vec<ActivityEntry> {
        self.state
            .read()
            .await
            .history
            .get(&book_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Gets the ids of all books currently lent out.
    pub async fn currently_borrowed(&self) -> Vec<BookId> {
        self.state.read().await.borrowed.iter().copied().collect()
    }

    pub async fn is_borrowed(&self, book_id: BookId) -> bool {
        self.state.read().await.borrowed.contains(&book_id)
    }

    /// Number of events this view has handled.
    pub async fn events_processed(&self) -> u64 {
        self.state.read().await.events_processed
    }

    /// Clears the view.
    pub async fn reset(&self) {
        *self.state.write().await = ActivityState::default();
    }
}

#[async_trait]
impl EventListener for LendingActivityView {
    fn name(&self) -> &'static str {
        "LendingActivityView"
    }

    async fn on_event(&self, event: &DomainEvent) -> Result<()> {
        let mut state = self.state.write().await;

        state
            .history
            .entry(event.book_id)
            .or_default()
            .push(ActivityEntry {
                event_type: event.event_type,
                timestamp: event.timestamp,
                correlation_id: event.correlation_id.clone(),
            });

        match event.event_type {
            EventType::BookBorrowed => {
                state.borrowed.insert(event.book_id);
            }
            EventType::BookReturned | EventType::BookRemoved => {
                state.borrowed.remove(&event.book_id);
            }
            EventType::BookAdded | EventType::BookUpdated => {}
        }

        state.events_processed += 1;
        Ok(())
    }
}
