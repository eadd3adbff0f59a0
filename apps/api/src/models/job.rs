use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::profile::JobInput;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub min_experience_years: Option<f64>,
    pub experience_level: Option<String>,
    pub education_level: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&JobPostingRow> for JobInput {
    fn from(row: &JobPostingRow) -> Self {
        JobInput {
            id: Some(row.id),
            title: Some(row.title.clone()),
            required_skills: Some(row.required_skills.clone()),
            preferred_skills: Some(row.preferred_skills.clone()),
            min_experience_years: row.min_experience_years,
            experience_level: row.experience_level.clone(),
            education_level: row.education_level.clone(),
            location: row.location.clone(),
            job_type: row.job_type.clone(),
            salary_min: row.salary_min,
            salary_max: row.salary_max,
        }
    }
}
