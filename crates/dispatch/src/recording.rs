//! Recording dispatcher for tests and local runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use domain::{DispatchError, DomainEvent, EventDispatcher, EventType};
use tokio::sync::RwLock;

use crate::Result;
use crate::listener::EventListener;

/// Captures every event it accepts, in order.
///
/// Usable both as a dispatcher in its own right and as a listener behind a
/// [`FanOutDispatcher`](crate::FanOutDispatcher). Dispatch can be made to fail
/// on demand to exercise error paths. Clones share the same recording.
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    events: Arc<RwLock<Vec<DomainEvent>>>,
    fail_on_dispatch: Arc<AtomicBool>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    pub async fn events(&self) -> Vec<DomainEvent> {
        self.events.read().await.clone()
    }

    /// Returns the types of the recorded events.
    pub async fn event_types(&self) -> Vec<EventType> {
        self.events
            .read()
            .await
            .iter()
            .map(|e| e.event_type)
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.events.write().await.clear();
    }

    /// Makes every subsequent dispatch fail without recording.
    pub fn set_fail_on_dispatch(&self, fail: bool) {
        self.fail_on_dispatch.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventDispatcher for RecordingDispatcher {
    async fn dispatch(&self, event: DomainEvent) -> std::result::Result<(), DispatchError> {
        if self.fail_on_dispatch.load(Ordering::SeqCst) {
            return Err(DispatchError::Failed("dispatch disabled".to_string()));
        }
        self.events.write().await.push(event);
        Ok(())
    }
}

#[async_trait]
impl EventListener for RecordingDispatcher {
    fn name(&self) -> &'static str {
        "RecordingDispatcher"
    }

    async fn on_event(&self, event: &DomainEvent) -> Result<()> {
        self.events.write().await.push(event.clone());
        Ok(())
    }
}
