//! HTTP route handlers.

pub mod books;
pub mod system;
