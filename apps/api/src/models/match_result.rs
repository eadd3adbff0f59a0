use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted copy of a `MatchResult`, one row per (candidate, job) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchResultRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub overall_score: i32,
    pub skill_score: i32,
    pub experience_score: i32,
    pub education_score: i32,
    pub location_score: i32,
    pub other_score: i32,
    pub match_level: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub bonus_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub scorer_backend: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
