//! Memoization of computed results, keyed by a hash of both normalized
//! records. Sits in front of the scorer; the scorer itself never caches.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::matching::levels::{EducationLevel, JobType};
use crate::matching::profile::{
    CandidateProfile, ExperienceRequirement, JobPosting, SalaryRange, Skill,
};
use crate::matching::scorer::{MatchResult, MatchScorer};

const KEY_PREFIX: &str = "match:v1:";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cached value is not a valid result: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait ScoreCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<MatchResult>, CacheError>;
    async fn put(&self, key: &str, result: &MatchResult) -> Result<(), CacheError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Key derivation
// ────────────────────────────────────────────────────────────────────────────

/// Fields that influence the result. Candidate skills are sorted keys because
/// their order and spelling never reach the output; job skills keep display
/// form and order because they do.
#[derive(Serialize)]
struct KeyMaterial<'a> {
    backend: &'a str,
    candidate_skills: Vec<&'a str>,
    experience_years: f64,
    candidate_education: EducationLevel,
    preferred_location: Option<String>,
    preferred_job_type: Option<JobType>,
    candidate_salary: Option<SalaryRange>,
    required_skills: &'a [Skill],
    preferred_skills: &'a [Skill],
    experience: ExperienceRequirement,
    job_education: EducationLevel,
    job_location: Option<String>,
    job_type: Option<JobType>,
    job_salary: Option<SalaryRange>,
}

pub fn cache_key(backend: &str, candidate: &CandidateProfile, job: &JobPosting) -> String {
    let mut candidate_skills: Vec<&str> = candidate.skills.iter().map(|s| s.key.as_str()).collect();
    candidate_skills.sort_unstable();

    let material = KeyMaterial {
        backend,
        candidate_skills,
        experience_years: candidate.experience_years,
        candidate_education: candidate.education_level,
        preferred_location: candidate.preferred_location.as_deref().map(str::to_lowercase),
        preferred_job_type: candidate.preferred_job_type,
        candidate_salary: candidate.salary,
        required_skills: &job.required_skills,
        preferred_skills: &job.preferred_skills,
        experience: job.experience,
        job_education: job.education_level,
        job_location: job.location.as_deref().map(str::to_lowercase),
        job_type: job.job_type,
        job_salary: job.salary,
    };

    // Serializing plain structs of strings and numbers cannot fail.
    let bytes = serde_json::to_vec(&material).unwrap_or_default();
    format!("{KEY_PREFIX}{}", hex::encode(Sha256::digest(&bytes)))
}

/// Looks the pair up in the cache, scoring and storing on a miss. Cache
/// failures are logged and never fail the caller.
pub async fn score_cached(
    cache: &dyn ScoreCache,
    scorer: &dyn MatchScorer,
    candidate: &CandidateProfile,
    job: &JobPosting,
) -> MatchResult {
    let key = cache_key(scorer.backend(), candidate, job);

    match cache.get(&key).await {
        Ok(Some(hit)) => {
            debug!("Match cache hit: {key}");
            return hit;
        }
        Ok(None) => {}
        Err(e) => warn!("Match cache read failed: {e}"),
    }

    let result = scorer.score(candidate, job);
    if let Err(e) = cache.put(&key, &result).await {
        warn!("Match cache write failed: {e}");
    }
    result
}

// ────────────────────────────────────────────────────────────────────────────
// Backends
// ────────────────────────────────────────────────────────────────────────────

/// Redis backend: JSON values stored with SETEX.
pub struct RedisScoreCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisScoreCache {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl ScoreCache for RedisScoreCache {
    async fn get(&self, key: &str) -> Result<Option<MatchResult>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, result: &MatchResult) -> Result<(), CacheError> {
        let json = serde_json::to_string(result)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(key, json, self.ttl_secs).await?;
        Ok(())
    }
}

/// Used when no Redis URL is configured.
pub struct NoopScoreCache;

#[async_trait]
impl ScoreCache for NoopScoreCache {
    async fn get(&self, _key: &str) -> Result<Option<MatchResult>, CacheError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _result: &MatchResult) -> Result<(), CacheError> {
        Ok(())
    }
}
