use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Result cache is disabled when unset.
    pub redis_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub match_cache_ttl_secs: u64,
    pub batch_max_jobs: usize,
    pub recommendation_limit: usize,
    pub recommendation_min_score: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            match_cache_ttl_secs: parse_env("MATCH_CACHE_TTL_SECS", 3600)?,
            batch_max_jobs: parse_env("BATCH_MAX_JOBS", 500)?,
            recommendation_limit: parse_env("RECOMMENDATION_LIMIT", 20)?,
            recommendation_min_score: parse_env("RECOMMENDATION_MIN_SCORE", 60)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
