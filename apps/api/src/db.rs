use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the matching tables if they do not exist yet. Safe to run on
/// every startup.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready ({} statements)", SCHEMA.len());
    Ok(())
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS candidate_profiles (
        id                 UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id            UUID NOT NULL UNIQUE,
        skills             TEXT[] NOT NULL DEFAULT '{}',
        experience_years   DOUBLE PRECISION,
        education_level    TEXT,
        preferred_location TEXT,
        preferred_job_type TEXT,
        salary_min         DOUBLE PRECISION,
        salary_max         DOUBLE PRECISION,
        is_seeking_job     BOOLEAN NOT NULL DEFAULT TRUE,
        created_at         TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at         TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_postings (
        id                   UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        employer_id          UUID NOT NULL,
        title                TEXT NOT NULL,
        required_skills      TEXT[] NOT NULL DEFAULT '{}',
        preferred_skills     TEXT[] NOT NULL DEFAULT '{}',
        min_experience_years DOUBLE PRECISION,
        experience_level     TEXT,
        education_level      TEXT,
        location             TEXT,
        job_type             TEXT,
        salary_min           DOUBLE PRECISION,
        salary_max           DOUBLE PRECISION,
        is_active            BOOLEAN NOT NULL DEFAULT TRUE,
        created_at           TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at           TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS match_results (
        id               UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        candidate_id     UUID NOT NULL REFERENCES candidate_profiles(id) ON DELETE CASCADE,
        job_id           UUID NOT NULL REFERENCES job_postings(id) ON DELETE CASCADE,
        overall_score    INTEGER NOT NULL CHECK (overall_score BETWEEN 0 AND 100),
        skill_score      INTEGER NOT NULL,
        experience_score INTEGER NOT NULL,
        education_score  INTEGER NOT NULL,
        location_score   INTEGER NOT NULL,
        other_score      INTEGER NOT NULL,
        match_level      TEXT NOT NULL,
        matched_skills   TEXT[] NOT NULL DEFAULT '{}',
        missing_skills   TEXT[] NOT NULL DEFAULT '{}',
        bonus_skills     TEXT[] NOT NULL DEFAULT '{}',
        strengths        TEXT[] NOT NULL DEFAULT '{}',
        weaknesses       TEXT[] NOT NULL DEFAULT '{}',
        recommendations  TEXT[] NOT NULL DEFAULT '{}',
        scorer_backend   TEXT NOT NULL,
        created_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (candidate_id, job_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_match_results_candidate_score ON match_results (candidate_id, overall_score DESC)",
    "CREATE INDEX IF NOT EXISTS idx_match_results_job_score ON match_results (job_id, overall_score DESC)",
    "CREATE INDEX IF NOT EXISTS idx_job_postings_active ON job_postings (is_active, created_at DESC)",
];
