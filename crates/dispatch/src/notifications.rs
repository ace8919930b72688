//! Human-readable notifications for book events.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use domain::{DomainEvent, EventType};
use tokio::sync::RwLock;

use crate::listener::EventListener;
use crate::{ListenerError, Result};

/// Port for delivering a notification message (a chat channel, for example).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Notifier that keeps messages in memory.
///
/// Delivery can be made to fail on demand. Clones share the same messages.
#[derive(Clone, Default)]
pub struct InMemoryNotifier {
    messages: Arc<RwLock<Vec<String>>>,
    fail_on_notify: Arc<AtomicBool>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.read().await.clone()
    }

    pub fn set_fail_on_notify(&self, fail: bool) {
        self.fail_on_notify.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        if self.fail_on_notify.load(Ordering::SeqCst) {
            return Err(ListenerError::Notification(
                "notifier unavailable".to_string(),
            ));
        }
        self.messages.write().await.push(message.to_string());
        Ok(())
    }
}

/// Notifier that writes messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        tracing::info!(target: "notifications", "{message}");
        Ok(())
    }
}

/// Turns each book event into a message and hands it to a [`Notifier`].
pub struct NotificationListener<N> {
    notifier: N,
}

impl<N: Notifier> NotificationListener<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

/// Formats the notification text for an event.
pub fn message_for(event: &DomainEvent) -> String {
    let id = event.book_id;
    let text = match event.event_type {
        EventType::BookAdded => format!("Book {id} was added to the collection"),
        EventType::BookUpdated => format!("Book {id} was updated"),
        EventType::BookRemoved => format!("Book {id} was removed from the collection"),
        EventType::BookBorrowed => format!("Book {id} was borrowed"),
        EventType::BookReturned => format!("Book {id} was returned"),
    };
    match &event.correlation_id {
        Some(correlation_id) => format!("{text} [{correlation_id}]"),
        None => text,
    }
}

#[async_trait]
impl<N: Notifier> EventListener for NotificationListener<N> {
    fn name(&self) -> &'static str {
        "NotificationListener"
    }

    async fn on_event(&self, event: &DomainEvent) -> Result<()> {
        self.notifier.notify(&message_for(event)).await
    }
}
