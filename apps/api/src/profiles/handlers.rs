//! Axum route handlers for job and candidate profiles.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::service::EmbeddingOutcome;
use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::job::JobContext;
use crate::state::AppState;

const DEFAULT_CANDIDATE_LIMIT: i64 = 50;
const MAX_CANDIDATE_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct CandidateListQuery {
    pub job_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobContext>, AppError> {
    let job = state
        .entities
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// POST /api/v1/jobs/:id/refine
pub async fn handle_refine_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<EmbeddingOutcome>, AppError> {
    let outcome = state.profiles.refine_job_embedding(job_id).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/candidates?job_id=&limit=
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_CANDIDATE_LIMIT);
    if !(1..=MAX_CANDIDATE_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_CANDIDATE_LIMIT}"
        )));
    }

    let candidates = state.entities.list_candidates(query.job_id, limit).await?;
    Ok(Json(candidates))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = state
        .entities
        .get_candidate(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
    Ok(Json(candidate))
}

/// POST /api/v1/candidates/:id/embed
pub async fn handle_embed_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<EmbeddingOutcome>, AppError> {
    let outcome = state.profiles.embed_candidate(candidate_id).await?;
    Ok(Json(outcome))
}
