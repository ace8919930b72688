//! Core listener trait.

use async_trait::async_trait;
use domain::DomainEvent;

use crate::Result;

/// Something that reacts to committed book events.
///
/// Listeners are registered with a [`FanOutDispatcher`](crate::FanOutDispatcher)
/// and receive events in commit order.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Returns the name of this listener, used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Handles a single event.
    async fn on_event(&self, event: &DomainEvent) -> Result<()>;
}
