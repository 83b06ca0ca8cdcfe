//! Ranking of a job's candidate pool.
//!
//! discover pool → assess each (bounded concurrency) → sort → summarize.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use super::pool::map_bounded;
use super::summary::PoolSummarizer;
use crate::assessment::AssessmentOrchestrator;
use crate::errors::AppError;
use crate::models::job::JobContext;
use crate::models::score_report::{Comparison, RankingReport, ScoreReport};
use crate::store::{embedding_or_none, Collections, EntityStore, VectorStore};

/// Vector neighbours fetched when no `top_k` is given.
const DEFAULT_NEIGHBOURS: usize = 50;
/// Candidates taken from the whole store when nothing else matched.
const DEFAULT_FALLBACK_POOL: usize = 100;
/// Upper bound on direct applicants loaded for one job.
const MAX_DIRECT_APPLICANTS: i64 = 1000;

pub struct RankingOrchestrator {
    assessor: Arc<AssessmentOrchestrator>,
    entities: Arc<dyn EntityStore>,
    vectors: Arc<dyn VectorStore>,
    summarizer: PoolSummarizer,
    collections: Collections,
    concurrency: usize,
}

impl RankingOrchestrator {
    pub fn new(
        assessor: Arc<AssessmentOrchestrator>,
        entities: Arc<dyn EntityStore>,
        vectors: Arc<dyn VectorStore>,
        summarizer: PoolSummarizer,
        collections: Collections,
        concurrency: usize,
    ) -> Self {
        Self {
            assessor,
            entities,
            vectors,
            summarizer,
            collections,
            concurrency,
        }
    }

    pub async fn rank(
        &self,
        job_id: Uuid,
        top_k: Option<usize>,
        force_refresh: bool,
    ) -> Result<RankingReport, AppError> {
        let job = self.load_job(job_id).await?;

        let pool = self.discover_pool(&job, top_k).await?;
        info!("Ranking {} candidates for job {}", pool.len(), job_id);

        let rankings = self.assess_pool(job_id, pool, force_refresh).await;
        let top_candidates_summary = self.summarizer.summarize(&job, &rankings).await;

        info!(
            "Ranked {} candidates for job {}",
            rankings.len(),
            job_id
        );

        Ok(RankingReport {
            job_id,
            job_title: job.job_title,
            total_candidates: rankings.len(),
            rankings,
            top_candidates_summary,
        })
    }

    /// Stored reports for the job, best first. Nothing is recomputed.
    pub async fn get_top(&self, job_id: Uuid, limit: usize) -> Result<Vec<ScoreReport>, AppError> {
        let mut reports = self.entities.list_score_reports(job_id).await?;
        sort_by_score(&mut reports);
        reports.truncate(limit);
        Ok(reports)
    }

    /// Assesses exactly the named candidates. Unlike `rank`, a candidate that
    /// does not exist fails the whole comparison.
    pub async fn compare(
        &self,
        candidate_ids: &[Uuid],
        job_id: Uuid,
    ) -> Result<Comparison, AppError> {
        let job = self.load_job(job_id).await?;
        let candidate_ids = dedup_preserving_order(candidate_ids.iter().copied());

        let assessor = self.assessor.clone();
        let results = map_bounded(candidate_ids.clone(), self.concurrency, move |candidate_id| {
            let assessor = assessor.clone();
            async move { assessor.assess(candidate_id, job_id, false).await }
        })
        .await;

        let mut rankings = Vec::with_capacity(results.len());
        for (candidate_id, result) in candidate_ids.iter().zip(results) {
            match result {
                Some(Ok(report)) => rankings.push(report),
                Some(Err(e)) => return Err(e),
                None => {
                    return Err(AppError::Internal(anyhow::anyhow!(
                        "Assessment of candidate {candidate_id} was aborted"
                    )))
                }
            }
        }
        sort_by_score(&mut rankings);

        let summary = self.summarizer.summarize(&job, &rankings).await;

        Ok(Comparison {
            job_id,
            job_title: job.job_title,
            candidates_compared: rankings.len(),
            best_candidate: rankings.first().map(ScoreReport::display_name),
            rankings,
            summary,
        })
    }

    async fn load_job(&self, job_id: Uuid) -> Result<JobContext, AppError> {
        self.entities
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
    }

    /// Direct applicants, then vector neighbours of the job, then (only if both
    /// are empty) the most recent candidates overall. Order is discovery order.
    async fn discover_pool(
        &self,
        job: &JobContext,
        top_k: Option<usize>,
    ) -> Result<Vec<Uuid>, AppError> {
        let mut pool: Vec<Uuid> = self
            .entities
            .list_candidates(Some(job.id), MAX_DIRECT_APPLICANTS)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        if let Some(embedding) =
            embedding_or_none(self.vectors.as_ref(), &self.collections.jobs, job.id).await
        {
            let k = top_k.unwrap_or(DEFAULT_NEIGHBOURS) as i64;
            match self
                .vectors
                .query_nearest(&self.collections.candidates, &embedding, k)
                .await
            {
                Ok(neighbours) => pool.extend(neighbours),
                Err(e) => warn!("Neighbour search failed for job {}: {}", job.id, e),
            }
        }

        let mut pool = dedup_preserving_order(pool);

        if pool.is_empty() {
            let limit = top_k.unwrap_or(DEFAULT_FALLBACK_POOL) as i64;
            pool = self
                .entities
                .list_candidates(None, limit)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();
        }

        if let Some(k) = top_k {
            pool.truncate(k);
        }
        Ok(pool)
    }

    /// Assesses every candidate; failures are logged and dropped. The result is
    /// sorted by score with ties kept in pool order.
    async fn assess_pool(
        &self,
        job_id: Uuid,
        pool: Vec<Uuid>,
        force_refresh: bool,
    ) -> Vec<ScoreReport> {
        let assessor = self.assessor.clone();
        let results = map_bounded(pool.clone(), self.concurrency, move |candidate_id| {
            let assessor = assessor.clone();
            async move { assessor.assess(candidate_id, job_id, force_refresh).await }
        })
        .await;

        let mut rankings = Vec::with_capacity(results.len());
        for (candidate_id, result) in pool.iter().zip(results) {
            match result {
                Some(Ok(report)) => rankings.push(report),
                Some(Err(e)) => {
                    error!(
                        "Skipping candidate {} for job {}: {}",
                        candidate_id, job_id, e
                    );
                }
                None => error!("Assessment of candidate {} was aborted", candidate_id),
            }
        }

        sort_by_score(&mut rankings);
        rankings
    }
}

/// Descending by overall score. Stable, so equal scores keep their order.
fn sort_by_score(reports: &mut [ScoreReport]) {
    reports.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));
}

fn dedup_preserving_order(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
