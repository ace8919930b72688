use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use serde::{Serialize, de::DeserializeOwned};

use crate::Result;

/// A value that can be persisted as a standalone document.
///
/// Documents are keyed by their aggregate id within a named collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the collection the document lives in (e.g. `"books"`).
    fn collection() -> &'static str;

    /// The document's key.
    fn document_id(&self) -> AggregateId;
}

/// Persistence port for documents of type `T`.
///
/// Writes are last-write-wins: `create_or_update` replaces whatever is stored
/// under the same id, so calling it twice with the same document is idempotent.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait DataStore<T: Document>: Send + Sync {
    /// Inserts the document, or replaces the stored one with the same id.
    ///
    /// Returns the document as stored.
    async fn create_or_update(&self, document: T) -> Result<T>;

    /// Removes the document. Deleting an absent document is not an error.
    async fn delete(&self, document: &T) -> Result<()>;

    /// Looks a document up by id.
    async fn find_by_id(&self, id: AggregateId) -> Result<Option<T>>;

    /// Returns every document in the collection, oldest first.
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Returns true if a document with this id is stored.
    async fn exists_by_id(&self, id: AggregateId) -> Result<bool>;
}

#[async_trait]
impl<T: Document, S: DataStore<T> + ?Sized> DataStore<T> for Arc<S> {
    async fn create_or_update(&self, document: T) -> Result<T> {
        (**self).create_or_update(document).await
    }

    async fn delete(&self, document: &T) -> Result<()> {
        (**self).delete(document).await
    }

    async fn find_by_id(&self, id: AggregateId) -> Result<Option<T>> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<T>> {
        (**self).find_all().await
    }

    async fn exists_by_id(&self, id: AggregateId) -> Result<bool> {
        (**self).exists_by_id(id).await
    }
}
