use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, VectorStore};

/// pgvector-backed embedding store. One table, partitioned by `collection`.
#[derive(Clone)]
pub struct PgVectorStore {
    pool: PgPool,
}

impl PgVectorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn get_embedding(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<Vec<f32>>, StoreError> {
        Ok(sqlx::query_scalar::<_, Vec<f32>>(
            "SELECT embedding::real[] FROM embeddings WHERE collection = $1 AND entity_id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn query_nearest(
        &self,
        collection: &str,
        query: &[f32],
        k: i64,
    ) -> Result<Vec<Uuid>, StoreError> {
        Ok(sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT entity_id
            FROM embeddings
            WHERE collection = $1 AND vector_dims(embedding) = cardinality($2::real[])
            ORDER BY embedding <=> $2::real[]::vector
            LIMIT $3
            "#,
        )
        .bind(collection)
        .bind(query)
        .bind(k)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn upsert_embedding(
        &self,
        collection: &str,
        id: Uuid,
        embedding: &[f32],
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO embeddings (collection, entity_id, embedding, updated_at)
            VALUES ($1, $2, $3::real[]::vector, NOW())
            ON CONFLICT (collection, entity_id)
            DO UPDATE SET embedding = EXCLUDED.embedding, updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(embedding)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
