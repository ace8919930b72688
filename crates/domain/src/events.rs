//! Book domain events and the dispatch port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CorrelationId, EventId};
use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::error::DispatchError;

/// Kinds of committed changes to a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    BookAdded,
    BookUpdated,
    BookRemoved,
    BookBorrowed,
    BookReturned,
}

impl EventType {
    /// Returns the event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::BookAdded => "BookAdded",
            EventType::BookUpdated => "BookUpdated",
            EventType::BookRemoved => "BookRemoved",
            EventType::BookBorrowed => "BookBorrowed",
            EventType::BookReturned => "BookReturned",
        }
    }

    /// Returns the key downstream consumers route on.
    pub fn routing_key(&self) -> &'static str {
        match self {
            EventType::BookAdded => "book-added",
            EventType::BookUpdated => "book-updated",
            EventType::BookRemoved => "book-removed",
            EventType::BookBorrowed => "book-borrowed",
            EventType::BookReturned => "book-returned",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of a committed change to a book.
///
/// The event only references the book by id; it does not carry or own the
/// aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique per occurrence.
    pub event_id: EventId,

    #[serde(rename = "type")]
    pub event_type: EventType,

    /// When the change was committed.
    pub timestamp: DateTime<Utc>,

    pub book_id: BookId,

    /// Set at the request boundary, never by the domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CorrelationId>,
}

impl DomainEvent {
    /// Creates a new event with a fresh id and no correlation.
    pub fn new(event_type: EventType, book_id: BookId, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_id: EventId::new(),
            event_type,
            timestamp,
            book_id,
            correlation_id: None,
        }
    }

    /// Returns a copy of this event tagged with `correlation_id`.
    pub fn with_correlation_id(self, correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id: Some(correlation_id),
            ..self
        }
    }

    pub fn routing_key(&self) -> &'static str {
        self.event_type.routing_key()
    }
}

/// Port for publishing domain events.
///
/// From the domain's point of view dispatch is fire-and-forget: the call
/// returns once the adapter has accepted the event. Delivery guarantees
/// belong to the adapter. The domain only promises that it calls `dispatch`
/// in commit order.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn dispatch(&self, event: DomainEvent) -> Result<(), DispatchError>;
}

#[async_trait]
impl<D: EventDispatcher + ?Sized> EventDispatcher for Arc<D> {
    async fn dispatch(&self, event: DomainEvent) -> Result<(), DispatchError> {
        (**self).dispatch(event).await
    }
}
