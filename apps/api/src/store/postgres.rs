use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{EntityStore, StoreError};
use crate::models::candidate::Candidate;
use crate::models::job::JobContext;
use crate::models::score_report::{Recommendation, ScoreReport};

/// Row shape of `score_reports`; `recommendation` is stored as its label.
#[derive(Debug, Clone, FromRow)]
struct ScoreReportRow {
    id: Uuid,
    candidate_id: Uuid,
    job_id: Uuid,
    candidate_name: Option<String>,
    overall_score: f64,
    skill_match_score: f64,
    experience_match_score: f64,
    semantic_similarity_score: f64,
    matched_skills: Vec<String>,
    missing_skills: Vec<String>,
    extra_skills: Vec<String>,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    reasoning: String,
    recommendation: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ScoreReportRow> for ScoreReport {
    type Error = StoreError;

    fn try_from(row: ScoreReportRow) -> Result<Self, Self::Error> {
        let recommendation: Recommendation =
            row.recommendation.parse().map_err(StoreError::Decode)?;
        Ok(ScoreReport {
            id: row.id,
            candidate_id: row.candidate_id,
            job_id: row.job_id,
            candidate_name: row.candidate_name,
            overall_score: row.overall_score,
            skill_match_score: row.skill_match_score,
            experience_match_score: row.experience_match_score,
            semantic_similarity_score: row.semantic_similarity_score,
            matched_skills: row.matched_skills,
            missing_skills: row.missing_skills,
            extra_skills: row.extra_skills,
            strengths: row.strengths,
            weaknesses: row.weaknesses,
            reasoning: row.reasoning,
            recommendation,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL-backed entity store.
#[derive(Clone)]
pub struct PgEntityStore {
    pool: PgPool,
}

impl PgEntityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn get_job(&self, id: Uuid) -> Result<Option<JobContext>, StoreError> {
        Ok(
            sqlx::query_as::<_, JobContext>("SELECT * FROM jobs WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>, StoreError> {
        Ok(
            sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_candidates(
        &self,
        job_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Candidate>, StoreError> {
        let candidates = match job_id {
            Some(job_id) => {
                sqlx::query_as::<_, Candidate>(
                    "SELECT * FROM candidates WHERE job_id = $1 ORDER BY created_at DESC LIMIT $2",
                )
                .bind(job_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Candidate>(
                    "SELECT * FROM candidates ORDER BY created_at DESC LIMIT $1",
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(candidates)
    }

    async fn replace_score_report(&self, report: &ScoreReport) -> Result<ScoreReport, StoreError> {
        // Single statement: the (candidate_id, job_id) unique constraint makes
        // concurrent writers converge on one row instead of racing delete+insert.
        let row = sqlx::query_as::<_, ScoreReportRow>(
            r#"
            INSERT INTO score_reports
                (id, candidate_id, job_id, candidate_name, overall_score,
                 skill_match_score, experience_match_score, semantic_similarity_score,
                 matched_skills, missing_skills, extra_skills,
                 strengths, weaknesses, reasoning, recommendation, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (candidate_id, job_id) DO UPDATE SET
                id = EXCLUDED.id,
                candidate_name = EXCLUDED.candidate_name,
                overall_score = EXCLUDED.overall_score,
                skill_match_score = EXCLUDED.skill_match_score,
                experience_match_score = EXCLUDED.experience_match_score,
                semantic_similarity_score = EXCLUDED.semantic_similarity_score,
                matched_skills = EXCLUDED.matched_skills,
                missing_skills = EXCLUDED.missing_skills,
                extra_skills = EXCLUDED.extra_skills,
                strengths = EXCLUDED.strengths,
                weaknesses = EXCLUDED.weaknesses,
                reasoning = EXCLUDED.reasoning,
                recommendation = EXCLUDED.recommendation,
                created_at = EXCLUDED.created_at
            RETURNING *
            "#,
        )
        .bind(report.id)
        .bind(report.candidate_id)
        .bind(report.job_id)
        .bind(&report.candidate_name)
        .bind(report.overall_score)
        .bind(report.skill_match_score)
        .bind(report.experience_match_score)
        .bind(report.semantic_similarity_score)
        .bind(&report.matched_skills)
        .bind(&report.missing_skills)
        .bind(&report.extra_skills)
        .bind(&report.strengths)
        .bind(&report.weaknesses)
        .bind(&report.reasoning)
        .bind(report.recommendation.as_str())
        .bind(report.created_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_score_report(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<ScoreReport>, StoreError> {
        sqlx::query_as::<_, ScoreReportRow>(
            "SELECT * FROM score_reports WHERE candidate_id = $1 AND job_id = $2",
        )
        .bind(candidate_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?
        .map(ScoreReport::try_from)
        .transpose()
    }

    async fn list_score_reports(&self, job_id: Uuid) -> Result<Vec<ScoreReport>, StoreError> {
        sqlx::query_as::<_, ScoreReportRow>(
            "SELECT * FROM score_reports WHERE job_id = $1 ORDER BY overall_score DESC, created_at ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ScoreReport::try_from)
        .collect()
    }
}
