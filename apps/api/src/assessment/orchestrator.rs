//! Assessment of one candidate against one job, with a stored-report cache.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::locks::PairLocks;
use crate::errors::AppError;
use crate::evaluation::{QualitativeEvaluation, QualitativeEvaluator};
use crate::models::candidate::Candidate;
use crate::models::job::JobContext;
use crate::models::score_report::ScoreReport;
use crate::scoring::{score_candidate, ScoreBreakdown, ScoringConfig};
use crate::store::{embedding_or_none, Collections, EntityStore, VectorStore};

/// Reports keep at most this many extra (unrequested) skills.
const MAX_EXTRA_SKILLS: usize = 10;

pub struct AssessmentOrchestrator {
    entities: Arc<dyn EntityStore>,
    vectors: Arc<dyn VectorStore>,
    evaluator: QualitativeEvaluator,
    scoring: ScoringConfig,
    collections: Collections,
    locks: PairLocks,
}

impl AssessmentOrchestrator {
    pub fn new(
        entities: Arc<dyn EntityStore>,
        vectors: Arc<dyn VectorStore>,
        evaluator: QualitativeEvaluator,
        scoring: ScoringConfig,
        collections: Collections,
    ) -> Self {
        Self {
            entities,
            vectors,
            evaluator,
            scoring,
            collections,
            locks: PairLocks::new(),
        }
    }

    /// Returns the stored report for the pair unless `force_refresh` is set or
    /// none exists, in which case the pair is scored, evaluated and stored,
    /// superseding any previous report.
    ///
    /// Only a missing candidate or job (or a failing entity store) is an error;
    /// embedding and LLM failures degrade to neutral/fallback values.
    pub async fn assess(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        force_refresh: bool,
    ) -> Result<ScoreReport, AppError> {
        if !force_refresh {
            if let Some(report) = self.cached(candidate_id, job_id).await? {
                return Ok(report);
            }
        }

        let _guard = self.locks.acquire((candidate_id, job_id)).await;

        // Another caller may have stored a report while we waited.
        if !force_refresh {
            if let Some(report) = self.cached(candidate_id, job_id).await? {
                return Ok(report);
            }
        }

        let candidate = self
            .entities
            .get_candidate(candidate_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        let job = self
            .entities
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

        info!("Assessing candidate {} for job {}", candidate_id, job_id);

        let candidate_embedding =
            embedding_or_none(self.vectors.as_ref(), &self.collections.candidates, candidate_id)
                .await;
        let job_embedding =
            embedding_or_none(self.vectors.as_ref(), &self.collections.jobs, job_id).await;

        let breakdown = score_candidate(
            &candidate,
            &job,
            candidate_embedding.as_deref(),
            job_embedding.as_deref(),
            &self.scoring,
        );
        let evaluation = self.evaluator.evaluate(&candidate, &job, &breakdown).await;

        let report = build_report(&candidate, &job, &breakdown, evaluation);
        let stored = self.entities.replace_score_report(&report).await?;

        info!(
            "Assessed candidate {} for job {}: {:.2} ({})",
            candidate_id, job_id, stored.overall_score, stored.recommendation
        );
        Ok(stored)
    }

    async fn cached(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<ScoreReport>, AppError> {
        let report = self.entities.get_score_report(candidate_id, job_id).await?;
        if report.is_some() {
            debug!("Score report cache hit for candidate {} / job {}", candidate_id, job_id);
        }
        Ok(report)
    }
}

fn build_report(
    candidate: &Candidate,
    job: &JobContext,
    breakdown: &ScoreBreakdown,
    evaluation: QualitativeEvaluation,
) -> ScoreReport {
    let skills = &breakdown.skill_match;
    let matched_skills = skills
        .matched_required
        .iter()
        .chain(skills.matched_preferred.iter())
        .cloned()
        .collect();

    ScoreReport {
        id: Uuid::new_v4(),
        candidate_id: candidate.id,
        job_id: job.id,
        candidate_name: candidate.name.clone(),
        overall_score: breakdown.overall_score,
        skill_match_score: skills.score,
        experience_match_score: breakdown.experience_match.score,
        semantic_similarity_score: breakdown.semantic_similarity,
        matched_skills,
        missing_skills: skills.missing_required.clone(),
        extra_skills: skills.extra.iter().take(MAX_EXTRA_SKILLS).cloned().collect(),
        strengths: evaluation.strengths,
        weaknesses: evaluation.weaknesses,
        reasoning: evaluation.reasoning,
        recommendation: evaluation.recommendation,
        created_at: Utc::now(),
    }
}
