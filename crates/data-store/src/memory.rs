use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::AggregateId;
use tokio::sync::RwLock;

use crate::{
    Result, StoreError,
    store::{DataStore, Document},
};

/// In-memory data store implementation for testing and local runs.
///
/// Documents are kept in insertion order, so `find_all` returns them oldest
/// first just like the PostgreSQL implementation. Reads and writes can be made
/// to fail on demand to exercise error paths.
pub struct InMemoryDataStore<T> {
    documents: Arc<RwLock<Vec<T>>>,
    fail_on_write: Arc<AtomicBool>,
    fail_on_read: Arc<AtomicBool>,
}

impl<T: Document> InMemoryDataStore<T> {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(Vec::new())),
            fail_on_write: Arc::new(AtomicBool::new(false)),
            fail_on_read: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Removes all documents.
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    /// Makes every subsequent `create_or_update` and `delete` fail.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.fail_on_write.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent lookup fail.
    pub fn set_fail_on_read(&self, fail: bool) {
        self.fail_on_read.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_on_write.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "writes to '{}' are disabled",
                T::collection()
            )));
        }
        Ok(())
    }

    fn check_readable(&self) -> Result<()> {
        if self.fail_on_read.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "reads from '{}' are disabled",
                T::collection()
            )));
        }
        Ok(())
    }
}

impl<T: Document> Default for InMemoryDataStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the same underlying documents.
impl<T> Clone for InMemoryDataStore<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            fail_on_write: Arc::clone(&self.fail_on_write),
            fail_on_read: Arc::clone(&self.fail_on_read),
        }
    }
}

#[async_trait]
impl<T: Document> DataStore<T> for InMemoryDataStore<T> {
    async fn create_or_update(&self, document: T) -> Result<T> {
        self.check_writable()?;

        let mut documents = self.documents.write().await;
        let id = document.document_id();
        match documents.iter_mut().find(|d| d.document_id() == id) {
            Some(existing) => *existing = document.clone(),
            None => documents.push(document.clone()),
        }

        Ok(document)
    }

    async fn delete(&self, document: &T) -> Result<()> {
        self.check_writable()?;

        let id = document.document_id();
        self.documents
            .write()
            .await
            .retain(|d| d.document_id() != id);
        Ok(())
    }

    async fn find_by_id(&self, id: AggregateId) -> Result<Option<T>> {
        self.check_readable()?;

        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.document_id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>> {
        self.check_readable()?;

        Ok(self.documents.read().await.clone())
    }

    async fn exists_by_id(&self, id: AggregateId) -> Result<bool> {
        self.check_readable()?;

        let documents = self.documents.read().await;
        Ok(documents.iter().any(|d| d.document_id() == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: AggregateId,
        text: String,
    }

    impl Note {
        fn new(text: &str) -> Self {
            Self {
                id: AggregateId::new(),
                text: text.to_string(),
            }
        }
    }

    impl Document for Note {
        fn collection() -> &'static str {
            "notes"
        }

        fn document_id(&self) -> AggregateId {
            self.id
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let store = InMemoryDataStore::new();
        let note = Note::new("first");

        let stored = store.create_or_update(note.clone()).await.unwrap();
        assert_eq!(stored, note);

        let found = store.find_by_id(note.id).await.unwrap();
        assert_eq!(found, Some(note.clone()));
        assert!(store.exists_by_id(note.id).await.unwrap());
        assert!(!store.exists_by_id(AggregateId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn create_or_update_replaces_in_place() {
        let store = InMemoryDataStore::new();
        let first = Note::new("first");
        let second = Note::new("second");
        store.create_or_update(first.clone()).await.unwrap();
        store.create_or_update(second.clone()).await.unwrap();

        let edited = Note {
            text: "edited".to_string(),
            ..first.clone()
        };
        store.create_or_update(edited.clone()).await.unwrap();
        store.create_or_update(edited.clone()).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![edited, second]);
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let store = InMemoryDataStore::new();
        let note = Note::new("gone soon");
        store.create_or_update(note.clone()).await.unwrap();

        store.delete(&note).await.unwrap();
        assert!(store.find_by_id(note.id).await.unwrap().is_none());
        assert!(store.is_empty().await);

        // Deleting again is fine.
        store.delete(&note).await.unwrap();
    }

    #[tokio::test]
    async fn find_all_on_empty_store_is_empty() {
        let store: InMemoryDataStore<Note> = InMemoryDataStore::new();
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn injected_write_failure() {
        let store = InMemoryDataStore::new();
        store.set_fail_on_write(true);

        let result = store.create_or_update(Note::new("nope")).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.len().await, 0);

        store.set_fail_on_write(false);
        store.create_or_update(Note::new("yes")).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn injected_read_failure() {
        let store: InMemoryDataStore<Note> = InMemoryDataStore::new();
        store.set_fail_on_read(true);

        assert!(store.find_all().await.is_err());
        assert!(store.exists_by_id(AggregateId::new()).await.is_err());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryDataStore::new();
        let handle = store.clone();
        store.create_or_update(Note::new("shared")).await.unwrap();
        assert_eq!(handle.len().await, 1);

        handle.clear().await;
        assert!(store.is_empty().await);
    }
}
