//! In-memory fakes for the store and LLM seams, used by unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::assessment::AssessmentOrchestrator;
use crate::config::Config;
use crate::evaluation::QualitativeEvaluator;
use crate::llm_client::{LlmError, LlmService, TextRequest};
use crate::models::candidate::Candidate;
use crate::models::job::JobContext;
use crate::models::score_report::ScoreReport;
use crate::profiles::ProfileService;
use crate::ranking::summary::PoolSummarizer;
use crate::ranking::RankingOrchestrator;
use crate::scoring::{semantic_similarity, ScoringConfig};
use crate::state::AppState;
use crate::store::{Collections, EntityStore, StoreError, VectorStore};

pub fn make_job(title: &str) -> JobContext {
    JobContext {
        id: Uuid::new_v4(),
        job_title: title.to_string(),
        seniority: None,
        required_skills: vec![],
        preferred_skills: vec![],
        experience_required: None,
        experience_min_years: None,
        experience_max_years: None,
        domain: None,
        job_summary: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn make_candidate(name: &str) -> Candidate {
    Candidate {
        id: Uuid::new_v4(),
        name: Some(name.to_string()),
        email: None,
        headline: None,
        skills: vec![],
        total_experience_years: None,
        summary: None,
        job_id: None,
        source: "upload".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct InMemoryEntityStore {
    jobs: Mutex<HashMap<Uuid, JobContext>>,
    // Insertion order; listing returns newest first.
    candidates: Mutex<Vec<Candidate>>,
    reports: Mutex<HashMap<(Uuid, Uuid), ScoreReport>>,
    report_writes: AtomicUsize,
    rejected_writes: Mutex<HashSet<Uuid>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_job(&self, job: JobContext) {
        self.jobs.lock().unwrap().insert(job.id, job);
    }

    pub fn add_candidate(&self, candidate: Candidate) {
        self.candidates.lock().unwrap().push(candidate);
    }

    pub fn report_count(&self, candidate_id: Uuid, job_id: Uuid) -> usize {
        self.reports
            .lock()
            .unwrap()
            .keys()
            .filter(|key| **key == (candidate_id, job_id))
            .count()
    }

    pub fn report_writes(&self) -> usize {
        self.report_writes.load(Ordering::SeqCst)
    }

    /// Makes every report write for this candidate fail.
    pub fn reject_writes_for(&self, candidate_id: Uuid) {
        self.rejected_writes.lock().unwrap().insert(candidate_id);
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn get_job(&self, id: Uuid) -> Result<Option<JobContext>, StoreError> {
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>, StoreError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_candidates(
        &self,
        job_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Candidate>, StoreError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| job_id.is_none() || c.job_id == job_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn replace_score_report(&self, report: &ScoreReport) -> Result<ScoreReport, StoreError> {
        if self
            .rejected_writes
            .lock()
            .unwrap()
            .contains(&report.candidate_id)
        {
            return Err(StoreError::Decode("score report write rejected".to_string()));
        }
        self.report_writes.fetch_add(1, Ordering::SeqCst);
        self.reports
            .lock()
            .unwrap()
            .insert((report.candidate_id, report.job_id), report.clone());
        Ok(report.clone())
    }

    async fn get_score_report(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<ScoreReport>, StoreError> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .get(&(candidate_id, job_id))
            .cloned())
    }

    async fn list_score_reports(&self, job_id: Uuid) -> Result<Vec<ScoreReport>, StoreError> {
        let mut reports: Vec<ScoreReport> = self
            .reports
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.job_id == job_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
        Ok(reports)
    }
}

#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: Mutex<HashMap<String, Vec<(Uuid, Vec<f32>)>>>,
    offline: Mutex<bool>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: &str, id: Uuid, embedding: Vec<f32>) {
        let mut collections = self.collections.lock().unwrap();
        let entries = collections.entry(collection.to_string()).or_default();
        entries.retain(|(existing, _)| *existing != id);
        entries.push((id, embedding));
    }

    /// Makes every subsequent call fail, as if the backing service were down.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if *self.offline.lock().unwrap() {
            return Err(StoreError::Decode("vector store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn get_embedding(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<Vec<f32>>, StoreError> {
        self.check_online()?;
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|entries| entries.iter().find(|(e, _)| *e == id))
            .map(|(_, v)| v.clone()))
    }

    async fn query_nearest(
        &self,
        collection: &str,
        query: &[f32],
        k: i64,
    ) -> Result<Vec<Uuid>, StoreError> {
        self.check_online()?;
        let collections = self.collections.lock().unwrap();
        let Some(entries) = collections.get(collection) else {
            return Ok(vec![]);
        };
        let mut scored: Vec<(Uuid, f64)> = entries
            .iter()
            .map(|(id, v)| (*id, semantic_similarity(Some(v.as_slice()), Some(query))))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(scored
            .into_iter()
            .take(k.max(0) as usize)
            .map(|(id, _)| id)
            .collect())
    }

    async fn upsert_embedding(
        &self,
        collection: &str,
        id: Uuid,
        embedding: &[f32],
    ) -> Result<(), StoreError> {
        self.check_online()?;
        self.insert(collection, id, embedding.to_vec());
        Ok(())
    }
}

/// `LlmService` that replays queued text responses. Once the queue is drained
/// every call fails with `EmptyContent`.
#[derive(Default)]
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
    embedding: Option<Vec<f32>>,
    text_calls: AtomicUsize,
    embed_calls: AtomicUsize,
}

impl ScriptedLlm {
    /// No responses queued: every text call fails and embedding is unavailable.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_texts(texts: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(texts.into_iter().map(|t| Ok(t.to_string())).collect()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(LlmError::RateLimited { retries: 3 })])),
            ..Self::default()
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn generate_text(&self, request: TextRequest<'_>) -> Result<String, LlmError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        self.embedding.clone().ok_or(LlmError::EmbeddingUnavailable)
    }
}

/// Application state over the in-memory fakes, wired the way `main` does it.
pub fn test_state(
    entities: Arc<InMemoryEntityStore>,
    vectors: Arc<InMemoryVectorStore>,
    llm: Arc<ScriptedLlm>,
) -> AppState {
    let config = Config {
        database_url: "postgres://localhost/screener_test".to_string(),
        anthropic_api_key: "test-key".to_string(),
        embedding_api_key: None,
        embedding_model: "voyage-3".to_string(),
        port: 0,
        rust_log: "info".to_string(),
        candidate_collection: "candidates".to_string(),
        job_collection: "job_contexts".to_string(),
        scoring: ScoringConfig::default(),
        ranking_concurrency: 2,
    };
    let llm: Arc<dyn LlmService> = llm;
    let collections = Collections::default();

    let assessor = Arc::new(AssessmentOrchestrator::new(
        entities.clone(),
        vectors.clone(),
        QualitativeEvaluator::new(llm.clone()),
        config.scoring,
        collections.clone(),
    ));
    let ranker = Arc::new(RankingOrchestrator::new(
        assessor.clone(),
        entities.clone(),
        vectors.clone(),
        PoolSummarizer::new(llm.clone()),
        collections.clone(),
        config.ranking_concurrency,
    ));
    let profiles = Arc::new(ProfileService::new(
        entities.clone(),
        vectors,
        llm,
        collections,
    ));

    AppState {
        config: Arc::new(config),
        entities,
        assessor,
        ranker,
        profiles,
    }
}
