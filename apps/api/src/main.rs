mod config;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::matching::cache::{NoopScoreCache, RedisScoreCache, ScoreCache};
use crate::matching::scorer::{MatchScorer, RuleBasedScorer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize result cache (Redis when configured)
    let cache: Arc<dyn ScoreCache> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!(
                "Redis match cache enabled (ttl {}s)",
                config.match_cache_ttl_secs
            );
            Arc::new(RedisScoreCache::new(client, config.match_cache_ttl_secs))
        }
        None => {
            info!("REDIS_URL not set, match cache disabled");
            Arc::new(NoopScoreCache)
        }
    };

    let scorer: Arc<dyn MatchScorer> = Arc::new(RuleBasedScorer::default());
    info!("Match scorer initialized (backend: {})", scorer.backend());

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        scorer,
        cache,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the SPA host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
