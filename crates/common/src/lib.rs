//! Shared kernel for the library service: identifiers, correlation and time.

pub mod clock;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use types::{AggregateId, CorrelationId, EventId};
