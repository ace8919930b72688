//! Collision-safe book id allocation.

use data_store::DataStore;

use crate::book::{Book, BookId};
use crate::error::DomainError;

/// Draws random book ids that are not yet used in the store.
///
/// There is no retry bound: a collision on a random 128-bit id is not
/// expected to happen in practice, but if it does the generator simply draws
/// again. Each attempt costs one existence check and holds no lock.
pub struct IdGenerator<S> {
    store: S,
}

impl<S: DataStore<Book>> IdGenerator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns an id for which the store reported no existing book.
    pub async fn generate(&self) -> Result<BookId, DomainError> {
        loop {
            let id = BookId::new();
            if !self.store.exists_by_id(id).await? {
                return Ok(id);
            }

            metrics::counter!("library_id_collisions_total").increment(1);
            tracing::warn!(book_id = %id, "generated book id already in use, drawing again");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use data_store::{InMemoryDataStore, StoreError};

    use super::*;

    /// Store that reports the first `collisions` ids it is asked about as taken.
    struct CollidingStore {
        collisions: AtomicUsize,
        checked: Mutex<Vec<BookId>>,
    }

    impl CollidingStore {
        fn new(collisions: usize) -> Self {
            Self {
                collisions: AtomicUsize::new(collisions),
                checked: Mutex::new(Vec::new()),
            }
        }

        fn checked(&self) -> Vec<BookId> {
            self.checked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DataStore<Book> for CollidingStore {
        async fn create_or_update(&self, book: Book) -> data_store::Result<Book> {
            Ok(book)
        }

        async fn delete(&self, _book: &Book) -> data_store::Result<()> {
            Ok(())
        }

        async fn find_by_id(&self, _id: BookId) -> data_store::Result<Option<Book>> {
            Ok(None)
        }

        async fn find_all(&self) -> data_store::Result<Vec<Book>> {
            Ok(Vec::new())
        }

        async fn exists_by_id(&self, id: BookId) -> data_store::Result<bool> {
            self.checked.lock().unwrap().push(id);
            let remaining = self.collisions.load(Ordering::SeqCst);
            if remaining > 0 {
                self.collisions.store(remaining - 1, Ordering::SeqCst);
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }

    #[tokio::test]
    async fn single_check_without_collision() {
        let store = std::sync::Arc::new(CollidingStore::new(0));
        let generator = IdGenerator::new(store.clone());

        let id = generator.generate().await.unwrap();

        assert_eq!(store.checked(), vec![id]);
    }

    #[tokio::test]
    async fn redraws_until_unused() {
        for collisions in [1, 3, 10] {
            let store = std::sync::Arc::new(CollidingStore::new(collisions));
            let generator = IdGenerator::new(store.clone());

            let id = generator.generate().await.unwrap();

            let checked = store.checked();
            assert_eq!(checked.len(), collisions + 1);
            assert_eq!(checked.last(), Some(&id));
            assert!(!checked[..collisions].contains(&id));
        }
    }

    #[tokio::test]
    async fn generated_ids_are_fresh() {
        let store = InMemoryDataStore::<Book>::new();
        let generator = IdGenerator::new(store.clone());

        let a = generator.generate().await.unwrap();
        let b = generator.generate().await.unwrap();

        assert_ne!(a, b);
        assert!(!store.exists_by_id(a).await.unwrap());
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = InMemoryDataStore::<Book>::new();
        store.set_fail_on_read(true);
        let generator = IdGenerator::new(store);

        let err = generator.generate().await.unwrap_err();
        assert!(matches!(err, DomainError::Store(StoreError::Unavailable(_))));
    }
}
