pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::AggregateId;
pub use error::{Result, StoreError};
pub use memory::InMemoryDataStore;
pub use postgres::PostgresDataStore;
pub use store::{DataStore, Document};
