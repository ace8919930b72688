//! Domain layer for the library book collection.
//!
//! This crate provides the core domain abstractions including:
//! - Book aggregate with its lending state machine and value objects
//! - Domain events and the EventDispatcher port
//! - Collision-safe book id generation
//! - CollectionService orchestrating persistence and event dispatch

pub mod book;
pub mod error;
pub mod events;
pub mod id_generator;
pub mod service;

pub use book::{
    Author, Book, BookDraft, BookId, Borrower, Isbn, LendingError, LendingState, NumberOfPages,
    Title, ValueError,
};
pub use error::{DispatchError, DomainError, ErrorKind};
pub use events::{DomainEvent, EventDispatcher, EventType};
pub use id_generator::IdGenerator;
pub use service::CollectionService;
