//! Axum route handlers for the Ranking API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::score_report::{Comparison, RankingReport, ScoreReport};
use crate::state::AppState;

/// Reports returned by the top endpoint when no limit is given.
const DEFAULT_TOP_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    pub top_k: Option<usize>,
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub candidate_ids: Vec<Uuid>,
    pub job_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: String,
    pub job_id: Uuid,
}

/// GET /api/v1/ranking/:job_id
pub async fn handle_rank(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RankingReport>, AppError> {
    if query.top_k == Some(0) {
        return Err(AppError::Validation("top_k must be at least 1".to_string()));
    }

    let report = state
        .ranker
        .rank(job_id, query.top_k, query.force_refresh)
        .await?;
    Ok(Json(report))
}

/// POST /api/v1/ranking/:job_id/refresh
///
/// Re-ranks the whole pool with `force_refresh` in the background and returns
/// immediately. The outcome is only logged.
pub async fn handle_refresh(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RefreshResponse>), AppError> {
    if state.entities.get_job(job_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    let ranker = state.ranker.clone();
    tokio::spawn(async move {
        match ranker.rank(job_id, None, true).await {
            Ok(report) => info!(
                "Background refresh for job {} ranked {} candidates",
                job_id, report.total_candidates
            ),
            Err(e) => error!("Background refresh for job {} failed: {}", job_id, e),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(RefreshResponse {
            status: "started".to_string(),
            job_id,
        }),
    ))
}

/// GET /api/v1/ranking/:job_id/top/:limit
pub async fn handle_top(
    State(state): State<AppState>,
    Path((job_id, limit)): Path<(Uuid, usize)>,
) -> Result<Json<Vec<ScoreReport>>, AppError> {
    if limit == 0 {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let reports = state.ranker.get_top(job_id, limit).await?;
    Ok(Json(reports))
}

/// GET /api/v1/ranking/:job_id/top
pub async fn handle_top_default(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ScoreReport>>, AppError> {
    let reports = state.ranker.get_top(job_id, DEFAULT_TOP_LIMIT).await?;
    Ok(Json(reports))
}

/// POST /api/v1/ranking/compare
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Comparison>, AppError> {
    if request.candidate_ids.is_empty() {
        return Err(AppError::Validation(
            "candidate_ids cannot be empty".to_string(),
        ));
    }

    let comparison = state
        .ranker
        .compare(&request.candidate_ids, request.job_id)
        .await?;
    Ok(Json(comparison))
}
