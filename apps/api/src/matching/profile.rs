//! Candidate and job records consumed by the scorer.
//!
//! Requests arrive as loosely-typed `*Input` payloads where every field is
//! optional. `TryFrom` converts them into validated `CandidateProfile` /
//! `JobPosting` records, rejecting missing or malformed required fields with
//! `InvalidInputError` before any scoring arithmetic runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::matching::levels::{EducationLevel, ExperienceLevel, JobType};

/// The job location value that matches every candidate.
pub const REMOTE: &str = "remote";

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Candidate,
    Job,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Candidate => write!(f, "candidate"),
            RecordKind::Job => write!(f, "job"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("{record} is missing required field '{field}'")]
    MissingField {
        record: RecordKind,
        field: &'static str,
    },

    #[error("{record} field '{field}' is invalid: {reason}")]
    InvalidField {
        record: RecordKind,
        field: &'static str,
        reason: String,
    },
}

impl InvalidInputError {
    fn missing(record: RecordKind, field: &'static str) -> Self {
        InvalidInputError::MissingField { record, field }
    }

    fn invalid(record: RecordKind, field: &'static str, reason: impl Into<String>) -> Self {
        InvalidInputError::InvalidField {
            record,
            field,
            reason: reason.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateInput {
    pub skills: Option<Vec<String>>,
    pub experience_years: Option<f64>,
    pub education_level: Option<String>,
    pub preferred_location: Option<String>,
    pub preferred_job_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobInput {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub min_experience_years: Option<f64>,
    pub experience_level: Option<String>,
    pub education_level: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Validated records
// ────────────────────────────────────────────────────────────────────────────

/// A skill as written by its author plus its normalized comparison key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub display: String,
    pub key: String,
}

impl Skill {
    pub fn new(raw: &str) -> Option<Self> {
        let display = raw.trim();
        if display.is_empty() {
            return None;
        }
        Some(Skill {
            display: display.to_string(),
            key: normalize_key(display),
        })
    }
}

/// Builds a deduplicated skill list, preserving first-seen order.
fn collect_skills(raw: &[String]) -> Vec<Skill> {
    let mut skills: Vec<Skill> = Vec::with_capacity(raw.len());
    for skill in raw.iter().filter_map(|s| Skill::new(s)) {
        if !skills.iter().any(|s| s.key == skill.key) {
            skills.push(skill);
        }
    }
    skills
}

/// Trimmed, lower-cased comparison key for skills and locations.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SalaryRange {
    /// Returns `None` when neither bound is set.
    fn from_bounds(
        record: RecordKind,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Option<Self>, InvalidInputError> {
        for (field, value) in [("salary_min", min), ("salary_max", max)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(InvalidInputError::invalid(
                        record,
                        field,
                        "must be a non-negative number",
                    ));
                }
            }
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(InvalidInputError::invalid(
                    record,
                    "salary_min",
                    "must not exceed salary_max",
                ));
            }
        }
        if min.is_none() && max.is_none() {
            return Ok(None);
        }
        Ok(Some(SalaryRange { min, max }))
    }

    /// Two ranges overlap when each lower bound is at most the other's upper
    /// bound. A missing bound is unbounded on that side.
    pub fn overlaps(&self, other: &SalaryRange) -> bool {
        let lower_ok = match (self.min, other.max) {
            (Some(lo), Some(hi)) => lo <= hi,
            _ => true,
        };
        let upper_ok = match (other.min, self.max) {
            (Some(lo), Some(hi)) => lo <= hi,
            _ => true,
        };
        lower_ok && upper_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub skills: Vec<Skill>,
    pub experience_years: f64,
    pub education_level: EducationLevel,
    pub preferred_location: Option<String>,
    pub preferred_job_type: Option<JobType>,
    pub salary: Option<SalaryRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExperienceRequirement {
    MinYears(f64),
    Level(ExperienceLevel),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPosting {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub required_skills: Vec<Skill>,
    pub preferred_skills: Vec<Skill>,
    pub experience: ExperienceRequirement,
    pub education_level: EducationLevel,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub salary: Option<SalaryRange>,
}

impl JobPosting {
    pub fn is_remote(&self) -> bool {
        self.location
            .as_deref()
            .map(|l| normalize_key(l) == REMOTE)
            .unwrap_or(false)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_education(
    record: RecordKind,
    raw: Option<&str>,
) -> Result<EducationLevel, InvalidInputError> {
    let raw = non_blank(raw).ok_or(InvalidInputError::missing(record, "education_level"))?;
    EducationLevel::parse(&raw).ok_or_else(|| {
        InvalidInputError::invalid(
            record,
            "education_level",
            format!("unknown education level '{raw}'"),
        )
    })
}

fn check_years(record: RecordKind, field: &'static str, years: f64) -> Result<f64, InvalidInputError> {
    if !years.is_finite() || years < 0.0 {
        return Err(InvalidInputError::invalid(
            record,
            field,
            "must be a non-negative number",
        ));
    }
    Ok(years)
}

impl TryFrom<&CandidateInput> for CandidateProfile {
    type Error = InvalidInputError;

    fn try_from(input: &CandidateInput) -> Result<Self, Self::Error> {
        let record = RecordKind::Candidate;

        let skills = input
            .skills
            .as_deref()
            .ok_or(InvalidInputError::missing(record, "skills"))?;
        let experience_years = input
            .experience_years
            .ok_or(InvalidInputError::missing(record, "experience_years"))?;

        Ok(CandidateProfile {
            skills: collect_skills(skills),
            experience_years: check_years(record, "experience_years", experience_years)?,
            education_level: parse_education(record, input.education_level.as_deref())?,
            preferred_location: non_blank(input.preferred_location.as_deref()),
            preferred_job_type: input.preferred_job_type.as_deref().and_then(JobType::parse),
            salary: SalaryRange::from_bounds(record, input.salary_min, input.salary_max)?,
        })
    }
}

impl TryFrom<&JobInput> for JobPosting {
    type Error = InvalidInputError;

    fn try_from(input: &JobInput) -> Result<Self, Self::Error> {
        let record = RecordKind::Job;

        let required_skills = input
            .required_skills
            .as_deref()
            .ok_or(InvalidInputError::missing(record, "required_skills"))?;

        // Minimum years takes precedence when a posting states both.
        let experience = match (input.min_experience_years, non_blank(input.experience_level.as_deref())) {
            (Some(years), _) => {
                ExperienceRequirement::MinYears(check_years(record, "min_experience_years", years)?)
            }
            (None, Some(level)) => ExperienceRequirement::Level(
                ExperienceLevel::parse(&level).ok_or_else(|| {
                    InvalidInputError::invalid(
                        record,
                        "experience_level",
                        format!("unknown experience level '{level}'"),
                    )
                })?,
            ),
            (None, None) => {
                return Err(InvalidInputError::missing(record, "min_experience_years"));
            }
        };

        Ok(JobPosting {
            id: input.id,
            title: non_blank(input.title.as_deref()),
            required_skills: collect_skills(required_skills),
            preferred_skills: collect_skills(input.preferred_skills.as_deref().unwrap_or_default()),
            experience,
            education_level: parse_education(record, input.education_level.as_deref())?,
            location: non_blank(input.location.as_deref()),
            job_type: input.job_type.as_deref().and_then(JobType::parse),
            salary: SalaryRange::from_bounds(record, input.salary_min, input.salary_max)?,
        })
    }
}
