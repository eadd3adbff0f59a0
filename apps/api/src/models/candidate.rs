use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::profile::CandidateInput;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skills: Vec<String>,
    pub experience_years: Option<f64>,
    pub education_level: Option<String>,
    pub preferred_location: Option<String>,
    pub preferred_job_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub is_seeking_job: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CandidateProfileRow> for CandidateInput {
    fn from(row: &CandidateProfileRow) -> Self {
        CandidateInput {
            skills: Some(row.skills.clone()),
            experience_years: row.experience_years,
            education_level: row.education_level.clone(),
            preferred_location: row.preferred_location.clone(),
            preferred_job_type: row.preferred_job_type.clone(),
            salary_min: row.salary_min,
            salary_max: row.salary_max,
        }
    }
}
