//! Embedding (re)generation for jobs and candidates.
//!
//! Existing score reports are left alone; callers re-rank with `force_refresh`
//! to pick up the new vectors.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmService;
use crate::store::{Collections, EntityStore, VectorStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingOutcome {
    pub entity_id: Uuid,
    pub collection: String,
    pub dimensions: usize,
}

pub struct ProfileService {
    entities: Arc<dyn EntityStore>,
    vectors: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmService>,
    collections: Collections,
}

impl ProfileService {
    pub fn new(
        entities: Arc<dyn EntityStore>,
        vectors: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmService>,
        collections: Collections,
    ) -> Self {
        Self {
            entities,
            vectors,
            llm,
            collections,
        }
    }

    /// Rebuilds the job's embedding from its current requirement fields.
    pub async fn refine_job_embedding(&self, job_id: Uuid) -> Result<EmbeddingOutcome, AppError> {
        let job = self
            .entities
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

        self.embed_and_store(&self.collections.jobs, job.id, &job.profile_text())
            .await
    }

    pub async fn embed_candidate(&self, candidate_id: Uuid) -> Result<EmbeddingOutcome, AppError> {
        let candidate = self
            .entities
            .get_candidate(candidate_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

        self.embed_and_store(
            &self.collections.candidates,
            candidate.id,
            &candidate.profile_text(),
        )
        .await
    }

    async fn embed_and_store(
        &self,
        collection: &str,
        entity_id: Uuid,
        text: &str,
    ) -> Result<EmbeddingOutcome, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "No profile text to embed for {collection}/{entity_id}"
            )));
        }

        let embedding = self.llm.embed(text).await?;

        self.vectors
            .upsert_embedding(collection, entity_id, &embedding)
            .await
            .map_err(AppError::vector_store)?;

        info!(
            "Stored {}-dim embedding for {}/{}",
            embedding.len(),
            collection,
            entity_id
        );

        Ok(EmbeddingOutcome {
            entity_id,
            collection: collection.to_string(),
            dimensions: embedding.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::candidate::Candidate;
    use crate::testing::{
        make_candidate, make_job, InMemoryEntityStore, InMemoryVectorStore, ScriptedLlm,
    };

    struct Fixture {
        service: ProfileService,
        entities: Arc<InMemoryEntityStore>,
        vectors: Arc<InMemoryVectorStore>,
        llm: Arc<ScriptedLlm>,
    }

    fn fixture(llm: ScriptedLlm) -> Fixture {
        let entities = Arc::new(InMemoryEntityStore::new());
        let vectors = Arc::new(InMemoryVectorStore::new());
        let llm = Arc::new(llm);
        let service = ProfileService::new(
            entities.clone(),
            vectors.clone(),
            llm.clone(),
            Collections::default(),
        );
        Fixture {
            service,
            entities,
            vectors,
            llm,
        }
    }

    fn skilled_candidate(name: &str) -> Candidate {
        let mut candidate = make_candidate(name);
        candidate.skills = vec!["Python".into(), "Airflow".into()];
        candidate
    }

    #[tokio::test]
    async fn test_refine_job_stores_new_embedding() {
        let f = fixture(ScriptedLlm::silent().with_embedding(vec![0.1, 0.2, 0.3]));
        let job = make_job("Data Engineer");
        let job_id = job.id;
        f.entities.add_job(job);

        let outcome = f.service.refine_job_embedding(job_id).await.unwrap();

        assert_eq!(outcome.dimensions, 3);
        assert_eq!(outcome.collection, "job_contexts");
        let stored = f.vectors.get_embedding("job_contexts", job_id).await.unwrap();
        assert_eq!(stored, Some(vec![0.1, 0.2, 0.3]));
        assert_eq!(f.llm.embed_calls(), 1);
    }

    #[tokio::test]
    async fn test_embed_candidate_replaces_previous_vector() {
        let f = fixture(ScriptedLlm::silent().with_embedding(vec![1.0, 0.0]));
        let candidate = skilled_candidate("Noor");
        let candidate_id = candidate.id;
        f.entities.add_candidate(candidate);
        f.vectors.insert("candidates", candidate_id, vec![0.0, 1.0]);

        f.service.embed_candidate(candidate_id).await.unwrap();

        let stored = f.vectors.get_embedding("candidates", candidate_id).await.unwrap();
        assert_eq!(stored, Some(vec![1.0, 0.0]));
    }

    #[tokio::test]
    async fn test_blank_profile_is_rejected_without_calling_embeddings() {
        let f = fixture(ScriptedLlm::silent().with_embedding(vec![1.0, 0.0]));
        let mut candidate = make_candidate("Noor");
        candidate.summary = Some("   ".into());
        let candidate_id = candidate.id;
        f.entities.add_candidate(candidate);

        let err = f.service.embed_candidate(candidate_id).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(f.llm.embed_calls(), 0);
        let stored = f.vectors.get_embedding("candidates", candidate_id).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_found() {
        let f = fixture(ScriptedLlm::silent().with_embedding(vec![1.0]));
        let err = f.service.refine_job_embedding(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(f.llm.embed_calls(), 0);
    }

    #[tokio::test]
    async fn test_embedding_service_errors_surface() {
        let f = fixture(ScriptedLlm::silent());
        let candidate = skilled_candidate("Noor");
        let candidate_id = candidate.id;
        f.entities.add_candidate(candidate);

        let err = f.service.embed_candidate(candidate_id).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::EmbeddingUnavailable)));
        assert_eq!(f.llm.embed_calls(), 1);
    }

    #[tokio::test]
    async fn test_vector_store_errors_surface() {
        let f = fixture(ScriptedLlm::silent().with_embedding(vec![1.0]));
        let job = make_job("SRE");
        let job_id = job.id;
        f.entities.add_job(job);
        f.vectors.set_offline(true);

        let err = f.service.refine_job_embedding(job_id).await.unwrap_err();
        assert!(matches!(err, AppError::VectorStore(_)));
    }
}
