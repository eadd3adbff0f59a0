//! PostgreSQL access for the matching endpoints: loads candidate and job
//! records and persists computed results.

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::matching::scorer::MatchResult;
use crate::models::candidate::CandidateProfileRow;
use crate::models::job::JobPostingRow;
use crate::models::match_result::MatchResultRow;

/// Overall score at which a stored match counts as high quality.
pub const HIGH_QUALITY_MIN: i32 = 80;
/// Overall score at which a stored match counts as medium quality.
pub const MEDIUM_QUALITY_MIN: i32 = 60;

pub async fn fetch_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Option<CandidateProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateProfileRow>("SELECT * FROM candidate_profiles WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Active postings, newest first.
pub async fn fetch_active_jobs(pool: &PgPool, limit: i64) -> Result<Vec<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings WHERE is_active ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Profiles of candidates still looking for work, most recently updated first.
pub async fn fetch_active_candidates(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<CandidateProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateProfileRow>(
        "SELECT * FROM candidate_profiles WHERE is_seeking_job ORDER BY updated_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Inserts the result for a (candidate, job) pair, replacing any earlier one.
pub async fn upsert_match_result(
    pool: &PgPool,
    candidate_id: Uuid,
    job_id: Uuid,
    result: &MatchResult,
    scorer_backend: &str,
) -> Result<MatchResultRow, sqlx::Error> {
    sqlx::query_as::<_, MatchResultRow>(
        r#"
        INSERT INTO match_results
            (candidate_id, job_id, overall_score, skill_score, experience_score,
             education_score, location_score, other_score, match_level,
             matched_skills, missing_skills, bonus_skills,
             strengths, weaknesses, recommendations, scorer_backend)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        ON CONFLICT (candidate_id, job_id) DO UPDATE SET
            overall_score    = EXCLUDED.overall_score,
            skill_score      = EXCLUDED.skill_score,
            experience_score = EXCLUDED.experience_score,
            education_score  = EXCLUDED.education_score,
            location_score   = EXCLUDED.location_score,
            other_score      = EXCLUDED.other_score,
            match_level      = EXCLUDED.match_level,
            matched_skills   = EXCLUDED.matched_skills,
            missing_skills   = EXCLUDED.missing_skills,
            bonus_skills     = EXCLUDED.bonus_skills,
            strengths        = EXCLUDED.strengths,
            weaknesses       = EXCLUDED.weaknesses,
            recommendations  = EXCLUDED.recommendations,
            scorer_backend   = EXCLUDED.scorer_backend,
            updated_at       = now()
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(job_id)
    .bind(result.overall_score as i32)
    .bind(result.skill_score as i32)
    .bind(result.experience_score as i32)
    .bind(result.education_score as i32)
    .bind(result.location_score as i32)
    .bind(result.other_score as i32)
    .bind(result.match_level.as_str())
    .bind(&result.matched_skills)
    .bind(&result.missing_skills)
    .bind(&result.bonus_skills)
    .bind(&result.strengths)
    .bind(&result.weaknesses)
    .bind(&result.recommendations)
    .bind(scorer_backend)
    .fetch_one(pool)
    .await
}

/// Stored results for a candidate, best first.
pub async fn list_results_for_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
    min_score: i32,
    limit: i64,
) -> Result<Vec<MatchResultRow>, sqlx::Error> {
    sqlx::query_as::<_, MatchResultRow>(
        r#"
        SELECT * FROM match_results
        WHERE candidate_id = $1 AND overall_score >= $2
        ORDER BY overall_score DESC, updated_at DESC
        LIMIT $3
        "#,
    )
    .bind(candidate_id)
    .bind(min_score)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Which side of the stored matches an aggregate covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsScope {
    Candidate(Uuid),
    Job(Uuid),
}

impl StatsScope {
    fn column(self) -> &'static str {
        match self {
            StatsScope::Candidate(_) => "candidate_id",
            StatsScope::Job(_) => "job_id",
        }
    }

    fn id(self) -> Uuid {
        match self {
            StatsScope::Candidate(id) | StatsScope::Job(id) => id,
        }
    }
}

/// Aggregate view over the stored matches of one candidate or one job.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MatchStatistics {
    pub total_matches: i64,
    pub high_quality_matches: i64,
    pub medium_quality_matches: i64,
    pub average_score: f64,
    pub top_score: i32,
}

fn statistics_sql(scope: StatsScope) -> String {
    format!(
        r#"
        SELECT
            COUNT(*)                                          AS total_matches,
            COUNT(*) FILTER (WHERE overall_score >= $2)       AS high_quality_matches,
            COUNT(*) FILTER (WHERE overall_score >= $3
                               AND overall_score <  $2)       AS medium_quality_matches,
            COALESCE(AVG(overall_score)::DOUBLE PRECISION, 0) AS average_score,
            COALESCE(MAX(overall_score), 0)                   AS top_score
        FROM match_results
        WHERE {} = $1
        "#,
        scope.column()
    )
}

/// Counts, average and best score of stored matches. All zero when nothing
/// has been stored yet.
pub async fn match_statistics(
    pool: &PgPool,
    scope: StatsScope,
) -> Result<MatchStatistics, sqlx::Error> {
    sqlx::query_as::<_, MatchStatistics>(&statistics_sql(scope))
        .bind(scope.id())
        .bind(HIGH_QUALITY_MIN)
        .bind(MEDIUM_QUALITY_MIN)
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_sql_filters_on_scope_column() {
        let id = Uuid::new_v4();
        let candidate = statistics_sql(StatsScope::Candidate(id));
        assert!(candidate.contains("WHERE candidate_id = $1"));
        assert!(!candidate.contains("job_id"));

        let job = statistics_sql(StatsScope::Job(id));
        assert!(job.contains("WHERE job_id = $1"));
        assert_eq!(StatsScope::Job(id).id(), id);
    }

    #[test]
    fn test_quality_bands_do_not_overlap() {
        assert!(MEDIUM_QUALITY_MIN < HIGH_QUALITY_MIN);
        assert!(HIGH_QUALITY_MIN <= 100);
    }

    #[test]
    fn test_statistics_serialize_shape() {
        let stats = MatchStatistics {
            total_matches: 3,
            high_quality_matches: 1,
            medium_quality_matches: 1,
            average_score: 71.5,
            top_score: 92,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["total_matches"], 3);
        assert_eq!(value["average_score"], 71.5);
        assert_eq!(value["top_score"], 92);
    }
}
