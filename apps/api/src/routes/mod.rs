pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route(
            "/api/v1/matching/calculate",
            post(handlers::handle_calculate),
        )
        .route("/api/v1/matching/batch", post(handlers::handle_batch))
        .route(
            "/api/v1/matching/candidates/:candidate_id/jobs/:job_id",
            post(handlers::handle_score_stored),
        )
        .route(
            "/api/v1/matching/candidates/:candidate_id/recommendations",
            post(handlers::handle_recommendations),
        )
        .route(
            "/api/v1/matching/candidates/:candidate_id/results",
            get(handlers::handle_list_results),
        )
        .route(
            "/api/v1/matching/candidates/:candidate_id/statistics",
            get(handlers::handle_candidate_statistics),
        )
        .route(
            "/api/v1/matching/jobs/:job_id/candidates",
            post(handlers::handle_job_candidates),
        )
        .route(
            "/api/v1/matching/jobs/:job_id/statistics",
            get(handlers::handle_job_statistics),
        )
        .with_state(state)
}
