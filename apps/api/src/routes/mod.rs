pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::profiles::handlers as profiles;
use crate::ranking::handlers as ranking;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ranking API
        .route("/api/v1/ranking/assess", post(assessment::handle_assess))
        .route("/api/v1/ranking/compare", post(ranking::handle_compare))
        .route("/api/v1/ranking/:job_id", get(ranking::handle_rank))
        .route(
            "/api/v1/ranking/:job_id/refresh",
            post(ranking::handle_refresh),
        )
        .route(
            "/api/v1/ranking/:job_id/top",
            get(ranking::handle_top_default),
        )
        .route(
            "/api/v1/ranking/:job_id/top/:limit",
            get(ranking::handle_top),
        )
        .route(
            "/api/v1/ranking/:job_id/candidates/:candidate_id",
            get(assessment::handle_get_candidate_score),
        )
        // Profiles API
        .route("/api/v1/jobs/:id", get(profiles::handle_get_job))
        .route("/api/v1/jobs/:id/refine", post(profiles::handle_refine_job))
        .route("/api/v1/candidates", get(profiles::handle_list_candidates))
        .route("/api/v1/candidates/:id", get(profiles::handle_get_candidate))
        .route(
            "/api/v1/candidates/:id/embed",
            post(profiles::handle_embed_candidate),
        )
        .with_state(state)
}
