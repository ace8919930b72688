//! Book enrichment from external data sources.
//!
//! When a book is added, each configured [`BookDataSource`] is asked about its
//! ISBN. Sources are consulted in a fixed priority order and their answers
//! merged field by field:
//! 1. Authors come from the first source that knows any
//! 2. Page count comes from the first source reporting a positive count
//!
//! A source that fails counts as one that knows nothing. If no source knows
//! anything useful the book is left alone; otherwise the merged data is
//! applied through the collection service, which records a `BookUpdated` event.

pub mod enricher;
pub mod error;
pub mod merge;
pub mod sources;

pub use enricher::BookEnricher;
pub use error::{EnrichmentError, Result};
pub use merge::{Enrichment, merge};
pub use sources::{BookData, BookDataSource, InMemoryBookDataSource};
