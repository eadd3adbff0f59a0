//! Axum route handlers for the Matching API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::batch::{
    rank_candidate_inputs, rank_job_inputs, CandidateEntry, RankOptions, RankedCandidates,
    RankedMatches,
};
use crate::matching::cache::score_cached;
use crate::matching::profile::{CandidateInput, CandidateProfile, JobInput, JobPosting};
use crate::matching::scorer::{MatchResult, MatchScorer};
use crate::matching::store::{self, MatchStatistics, StatsScope};
use crate::models::match_result::MatchResultRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub candidate: CandidateInput,
    #[serde(default)]
    pub job: JobInput,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub candidate: CandidateInput,
    pub jobs: Vec<JobInput>,
    pub min_score: Option<u32>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub min_score: Option<u32>,
    pub limit: Option<usize>,
}

fn check_min_score(min_score: Option<u32>) -> Result<u32, AppError> {
    match min_score {
        Some(score) if score > 100 => Err(AppError::Validation(
            "min_score must be between 0 and 100".to_string(),
        )),
        Some(score) => Ok(score),
        None => Ok(0),
    }
}

/// Bounds a caller-supplied result limit by `max`.
fn check_limit(limit: Option<usize>, max: usize) -> Result<Option<usize>, AppError> {
    match limit {
        Some(limit) if limit > max => Err(AppError::Validation(format!(
            "limit must be at most {max}, got {limit}"
        ))),
        other => Ok(other),
    }
}

/// Runs a batch ranking on the blocking pool so rayon work never stalls the
/// async runtime.
async fn rank_off_runtime(
    scorer: Arc<dyn MatchScorer>,
    candidate: CandidateProfile,
    jobs: Vec<JobInput>,
    options: RankOptions,
) -> Result<RankedMatches, AppError> {
    tokio::task::spawn_blocking(move || rank_job_inputs(scorer.as_ref(), &candidate, &jobs, options))
        .await
        .context("batch ranking task failed")
        .map_err(AppError::Internal)
}

async fn rank_candidates_off_runtime(
    scorer: Arc<dyn MatchScorer>,
    job: JobPosting,
    candidates: Vec<CandidateEntry>,
    options: RankOptions,
) -> Result<RankedCandidates, AppError> {
    tokio::task::spawn_blocking(move || {
        rank_candidate_inputs(scorer.as_ref(), &job, &candidates, options)
    })
    .await
    .context("candidate ranking task failed")
    .map_err(AppError::Internal)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/matching/calculate
///
/// Scores one candidate against one job, both supplied inline.
pub async fn handle_calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let candidate = CandidateProfile::try_from(&request.candidate)?;
    let job = JobPosting::try_from(&request.job)?;

    let result = score_cached(state.cache.as_ref(), state.scorer.as_ref(), &candidate, &job).await;
    Ok(Json(result))
}

/// POST /api/v1/matching/batch
///
/// Ranks a list of inline jobs for one candidate. Jobs that fail validation
/// are listed under `rejected`; the candidate failing validation fails the
/// whole request.
pub async fn handle_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<RankedMatches>, AppError> {
    let min_score = check_min_score(request.min_score)?;
    let limit = check_limit(request.limit, state.config.batch_max_jobs)?;
    if request.jobs.len() > state.config.batch_max_jobs {
        return Err(AppError::Validation(format!(
            "at most {} jobs may be scored per batch, got {}",
            state.config.batch_max_jobs,
            request.jobs.len()
        )));
    }

    let candidate = CandidateProfile::try_from(&request.candidate)?;
    let options = RankOptions { min_score, limit };

    let ranked = rank_off_runtime(state.scorer.clone(), candidate, request.jobs, options).await?;
    Ok(Json(ranked))
}

/// POST /api/v1/matching/candidates/:candidate_id/jobs/:job_id
///
/// Loads both records, scores them and stores the result.
pub async fn handle_score_stored(
    State(state): State<AppState>,
    Path((candidate_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MatchResultRow>, AppError> {
    let candidate_row = store::fetch_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
    let job_row = store::fetch_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let candidate = CandidateProfile::try_from(&CandidateInput::from(&candidate_row))?;
    let job = JobPosting::try_from(&JobInput::from(&job_row))?;

    let result = score_cached(state.cache.as_ref(), state.scorer.as_ref(), &candidate, &job).await;
    let row = store::upsert_match_result(
        &state.db,
        candidate_id,
        job_id,
        &result,
        state.scorer.backend(),
    )
    .await?;

    info!(
        "Stored match {candidate_id} -> {job_id}: {}/100",
        result.overall_score
    );
    Ok(Json(row))
}

/// POST /api/v1/matching/candidates/:candidate_id/recommendations
///
/// Scores the candidate against every active job, stores results at or above
/// `min_score` and returns the best `limit` of them.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(params): Query<ResultsQuery>,
) -> Result<Json<RankedMatches>, AppError> {
    let min_score =
        check_min_score(params.min_score.or(Some(state.config.recommendation_min_score)))?;
    let limit = check_limit(params.limit, state.config.batch_max_jobs)?
        .unwrap_or(state.config.recommendation_limit);

    let candidate_row = store::fetch_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
    let candidate = CandidateProfile::try_from(&CandidateInput::from(&candidate_row))?;

    let job_rows = store::fetch_active_jobs(&state.db, state.config.batch_max_jobs as i64).await?;
    let jobs: Vec<JobInput> = job_rows.iter().map(JobInput::from).collect();

    let options = RankOptions {
        min_score,
        limit: Some(limit),
    };
    let ranked = rank_off_runtime(state.scorer.clone(), candidate, jobs, options).await?;

    for m in &ranked.matches {
        if let Some(job_id) = m.job_id {
            store::upsert_match_result(
                &state.db,
                candidate_id,
                job_id,
                &m.result,
                state.scorer.backend(),
            )
            .await?;
        }
    }

    info!(
        "Recommendations for {candidate_id}: {} of {} active jobs at or above {min_score}",
        ranked.matches.len(),
        ranked.scored
    );
    Ok(Json(ranked))
}

/// GET /api/v1/matching/candidates/:candidate_id/results
///
/// Lists stored results for a candidate, best first.
pub async fn handle_list_results(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(params): Query<ResultsQuery>,
) -> Result<Json<Vec<MatchResultRow>>, AppError> {
    let min_score = check_min_score(params.min_score)?;
    let limit = check_limit(params.limit, state.config.batch_max_jobs)?
        .unwrap_or(state.config.recommendation_limit);

    let rows =
        store::list_results_for_candidate(&state.db, candidate_id, min_score as i32, limit as i64)
            .await?;
    Ok(Json(rows))
}

/// POST /api/v1/matching/jobs/:job_id/candidates
///
/// Scores the job against every candidate still seeking work, stores results
/// at or above `min_score` and returns the best `limit` of them.
pub async fn handle_job_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<ResultsQuery>,
) -> Result<Json<RankedCandidates>, AppError> {
    let min_score =
        check_min_score(params.min_score.or(Some(state.config.recommendation_min_score)))?;
    let limit = check_limit(params.limit, state.config.batch_max_jobs)?
        .unwrap_or(state.config.recommendation_limit);

    let job_row = store::fetch_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    let job = JobPosting::try_from(&JobInput::from(&job_row))?;

    let candidate_rows =
        store::fetch_active_candidates(&state.db, state.config.batch_max_jobs as i64).await?;
    let candidates: Vec<CandidateEntry> = candidate_rows
        .iter()
        .map(|row| CandidateEntry {
            id: Some(row.id),
            input: CandidateInput::from(row),
        })
        .collect();

    let options = RankOptions {
        min_score,
        limit: Some(limit),
    };
    let ranked = rank_candidates_off_runtime(state.scorer.clone(), job, candidates, options).await?;

    for m in &ranked.matches {
        if let Some(candidate_id) = m.candidate_id {
            store::upsert_match_result(
                &state.db,
                candidate_id,
                job_id,
                &m.result,
                state.scorer.backend(),
            )
            .await?;
        }
    }

    info!(
        "Candidates for job {job_id}: {} of {} profiles at or above {min_score}",
        ranked.matches.len(),
        ranked.scored
    );
    Ok(Json(ranked))
}

/// GET /api/v1/matching/candidates/:candidate_id/statistics
pub async fn handle_candidate_statistics(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<MatchStatistics>, AppError> {
    store::fetch_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let stats = store::match_statistics(&state.db, StatsScope::Candidate(candidate_id)).await?;
    Ok(Json(stats))
}

/// GET /api/v1/matching/jobs/:job_id/statistics
pub async fn handle_job_statistics(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<MatchStatistics>, AppError> {
    store::fetch_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let stats = store::match_statistics(&state.db, StatsScope::Job(job_id)).await?;
    Ok(Json(stats))
}
