use std::marker::PhantomData;

use async_trait::async_trait;
use common::AggregateId;
use sqlx::PgPool;

use crate::{
    Result,
    store::{DataStore, Document},
};

/// PostgreSQL-backed data store.
///
/// Each document is serialized to JSONB and stored in the shared `documents`
/// table under its collection name and id.
pub struct PostgresDataStore<T> {
    pool: PgPool,
    _document: PhantomData<fn() -> T>,
}

impl<T: Document> PostgresDataStore<T> {
    /// Creates a new PostgreSQL data store.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _document: PhantomData,
        }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn decode(body: serde_json::Value) -> Result<T> {
        Ok(serde_json::from_value(body)?)
    }
}

impl<T> Clone for PostgresDataStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _document: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Document> DataStore<T> for PostgresDataStore<T> {
    #[tracing::instrument(skip(self, document), fields(collection = T::collection(), id = %document.document_id()))]
    async fn create_or_update(&self, document: T) -> Result<T> {
        let body = serde_json::to_value(&document)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            "#,
        )
        .bind(T::collection())
        .bind(document.document_id().as_uuid())
        .bind(body)
        .execute(&self.pool)
        .await?;

        metrics::counter!("data_store_writes_total", "collection" => T::collection()).increment(1);
        Ok(document)
    }

    #[tracing::instrument(skip(self, document), fields(collection = T::collection(), id = %document.document_id()))]
    async fn delete(&self, document: &T) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(T::collection())
            .bind(document.document_id().as_uuid())
            .execute(&self.pool)
            .await?;

        metrics::counter!("data_store_deletes_total", "collection" => T::collection())
            .increment(1);
        Ok(())
    }

    async fn find_by_id(&self, id: AggregateId) -> Result<Option<T>> {
        let body: Option<serde_json::Value> = sqlx::query_scalar(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(T::collection())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        body.map(Self::decode).transpose()
    }

    async fn find_all(&self) -> Result<Vec<T>> {
        let bodies: Vec<serde_json::Value> = sqlx::query_scalar(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(T::collection())
        .fetch_all(&self.pool)
        .await?;

        bodies.into_iter().map(Self::decode).collect()
    }

    async fn exists_by_id(&self, id: AggregateId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM documents WHERE collection = $1 AND id = $2)",
        )
        .bind(T::collection())
        .bind(id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
