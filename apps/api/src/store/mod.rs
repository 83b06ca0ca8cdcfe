//! Persistence seams used by the scoring core.
//!
//! `EntityStore` is the source of truth for jobs, candidates and score reports.
//! `VectorStore` is authoritative only for embeddings and is queried independently.

pub mod postgres;
pub mod vectors;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::candidate::Candidate;
use crate::models::job::JobContext;
use crate::models::score_report::ScoreReport;

pub use postgres::PgEntityStore;
pub use vectors::PgVectorStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored row could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_job(&self, id: Uuid) -> Result<Option<JobContext>, StoreError>;

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>, StoreError>;

    /// Newest first. `job_id` restricts to candidates who applied to that job.
    async fn list_candidates(
        &self,
        job_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Candidate>, StoreError>;

    /// Stores `report`, replacing any existing report for the same
    /// (candidate_id, job_id) pair. Returns the report as stored.
    async fn replace_score_report(&self, report: &ScoreReport) -> Result<ScoreReport, StoreError>;

    async fn get_score_report(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<ScoreReport>, StoreError>;

    /// All reports for a job, highest overall score first.
    async fn list_score_reports(&self, job_id: Uuid) -> Result<Vec<ScoreReport>, StoreError>;
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn get_embedding(&self, collection: &str, id: Uuid)
        -> Result<Option<Vec<f32>>, StoreError>;

    /// Ids ordered from most to least similar.
    async fn query_nearest(
        &self,
        collection: &str,
        query: &[f32],
        k: i64,
    ) -> Result<Vec<Uuid>, StoreError>;

    async fn upsert_embedding(
        &self,
        collection: &str,
        id: Uuid,
        embedding: &[f32],
    ) -> Result<(), StoreError>;
}

/// Vector collection names for the two embedded entity kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub candidates: String,
    pub jobs: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            candidates: "candidates".to_string(),
            jobs: "job_contexts".to_string(),
        }
    }
}

/// Embedding lookup for scoring: a missing vector or a failing store both yield
/// `None`, which semantic similarity treats as neutral.
pub async fn embedding_or_none(
    vectors: &dyn VectorStore,
    collection: &str,
    id: Uuid,
) -> Option<Vec<f32>> {
    match vectors.get_embedding(collection, id).await {
        Ok(embedding) => embedding,
        Err(e) => {
            warn!("Embedding lookup failed for {collection}/{id}: {e}");
            None
        }
    }
}
