//! Broadcast channel bridge for asynchronous consumers.

use async_trait::async_trait;
use domain::DomainEvent;
use tokio::sync::broadcast;

use crate::Result;
use crate::listener::EventListener;

/// Default number of events buffered per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

/// Forwards events onto a tokio broadcast channel.
///
/// Consumers that need to do slow or re-entrant work (such as calling back
/// into the collection service) subscribe to the channel and run in their own
/// task, so the operation that committed the event never waits for them.
/// A subscriber that falls more than the channel capacity behind loses the
/// oldest events.
#[derive(Debug, Clone)]
pub struct BroadcastListener {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastListener {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a new receiver that sees every event sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastListener {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl EventListener for BroadcastListener {
    fn name(&self) -> &'static str {
        "BroadcastListener"
    }

    async fn on_event(&self, event: &DomainEvent) -> Result<()> {
        // Sending only fails when nobody is subscribed.
        if self.sender.send(event.clone()).is_err() {
            tracing::debug!(event_id = %event.event_id, "no subscribers for event");
        }
        Ok(())
    }
}
