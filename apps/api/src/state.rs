use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::matching::cache::ScoreCache;
use crate::matching::scorer::MatchScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable match scorer. Default: RuleBasedScorer.
    pub scorer: Arc<dyn MatchScorer>,
    /// Redis-backed when REDIS_URL is set, otherwise a no-op.
    pub cache: Arc<dyn ScoreCache>,
}
