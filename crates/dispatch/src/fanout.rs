//! Fan-out dispatcher delivering events to registered listeners.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{DispatchError, DomainEvent, EventDispatcher};

use crate::listener::EventListener;

/// Delivers each dispatched event to every registered listener.
///
/// Listeners run one after another in registration order. Once an event
/// reaches this dispatcher the change it describes is already committed, so a
/// failing listener is logged and counted but never fails the dispatch, and
/// the remaining listeners still receive the event.
#[derive(Default)]
pub struct FanOutDispatcher {
    listeners: Vec<Arc<dyn EventListener>>,
}

impl FanOutDispatcher {
    /// Creates a dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn register(&mut self, listener: Arc<dyn EventListener>) {
        tracing::debug!(listener = listener.name(), "listener registered");
        self.listeners.push(listener);
    }

    /// Registers a listener, builder style.
    pub fn with_listener(mut self, listener: Arc<dyn EventListener>) -> Self {
        self.register(listener);
        self
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[async_trait]
impl EventDispatcher for FanOutDispatcher {
    #[tracing::instrument(
        skip(self, event),
        fields(event_id = %event.event_id, event_type = %event.event_type, book_id = %event.book_id)
    )]
    async fn dispatch(&self, event: DomainEvent) -> Result<(), DispatchError> {
        for listener in &self.listeners {
            if let Err(e) = listener.on_event(&event).await {
                metrics::counter!("library_listener_failures_total", "listener" => listener.name())
                    .increment(1);
                tracing::warn!(listener = listener.name(), error = %e, "listener failed to handle event");
            }
        }

        metrics::counter!("library_events_dispatched_total", "type" => event.event_type.as_str())
            .increment(1);
        Ok(())
    }
}
