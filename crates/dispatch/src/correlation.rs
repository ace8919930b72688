//! Correlation id stamping at the request boundary.

use async_trait::async_trait;
use common::CorrelationId;
use domain::{DispatchError, DomainEvent, EventDispatcher};

/// Wraps a dispatcher and tags every event with one request's correlation id.
///
/// The entry adapter builds one of these per request around the shared
/// dispatcher, so the domain never has to know about correlation at all.
/// An event that already carries a correlation id keeps it.
#[derive(Debug, Clone)]
pub struct CorrelatingDispatcher<D> {
    inner: D,
    correlation_id: CorrelationId,
}

impl<D: EventDispatcher> CorrelatingDispatcher<D> {
    pub fn new(inner: D, correlation_id: CorrelationId) -> Self {
        Self {
            inner,
            correlation_id,
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }
}

#[async_trait]
impl<D: EventDispatcher> EventDispatcher for CorrelatingDispatcher<D> {
    async fn dispatch(&self, event: DomainEvent) -> Result<(), DispatchError> {
        let event = match event.correlation_id {
            Some(_) => event,
            None => event.with_correlation_id(self.correlation_id.clone()),
        };
        self.inner.dispatch(event).await
    }
}
