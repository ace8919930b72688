//! Event dispatch adapters for the book collection.
//!
//! This crate provides the delivery side of the domain's `EventDispatcher` port:
//! - [`EventListener`] trait for anything that reacts to book events
//! - [`FanOutDispatcher`] delivering each event to every registered listener
//! - [`CorrelatingDispatcher`] stamping a request's correlation id on its events
//! - [`RecordingDispatcher`] capturing events for tests
//! - [`BroadcastListener`] feeding events to asynchronous consumers
//! - [`LendingActivityView`] read model and [`NotificationListener`]

pub mod broadcast;
pub mod correlation;
pub mod error;
pub mod fanout;
pub mod listener;
pub mod notifications;
pub mod recording;
pub mod views;

pub use broadcast::BroadcastListener;
pub use correlation::CorrelatingDispatcher;
pub use error::{ListenerError, Result};
pub use fanout::FanOutDispatcher;
pub use listener::EventListener;
pub use notifications::{InMemoryNotifier, LogNotifier, NotificationListener, Notifier};
pub use recording::RecordingDispatcher;
pub use views::{ActivityEntry, LendingActivityView};
