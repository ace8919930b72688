//! Read model views fed by book events.

pub mod activity;

pub use activity::{ActivityEntry, LendingActivityView};
