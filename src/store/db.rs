use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tracing::{info, instrument};

/// Shared Postgres handle. Acquired once per binary run and dropped when the
/// run ends, whatever the outcome, so pooled connections are always released.
#[derive(Clone)]
pub struct Db {
    pub pool: PgPool,
}

impl Db {
    // SECURITY: never include raw DSNs in tracing spans (they may contain credentials).
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let use_prepared = crate::util::env::env_flag("USE_PREPARED", false);
        let mut connect_options = PgConnectOptions::from_str(database_url)?;

        // Be explicit about TLS when the DSN asks for it.
        if database_url.contains("sslmode=require") && !database_url.contains("sslmode=disable") {
            connect_options = connect_options.ssl_mode(PgSslMode::Require);
        }

        if !use_prepared {
            // PgBouncer txn mode safe
            connect_options = connect_options.statement_cache_capacity(0);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .connect_with(connect_options)
            .await?;
        info!("connected to db");

        // Schema bootstrap is opt-in: these tools normally run against the
        // CMS's existing database and must not alter it by default.
        if crate::util::env::env_flag("AUTO_MIGRATE", false) {
            info!("ensuring influencer schema (AUTO_MIGRATE=on)");
            Self::ensure_schema(&pool).await?;
        }
        Ok(Self { pool })
    }

    async fn ensure_schema(pool: &PgPool) -> Result<()> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS influencers (
                id BIGSERIAL PRIMARY KEY,
                document_id TEXT NOT NULL,
                locale TEXT NOT NULL,
                slug TEXT NOT NULL,
                name TEXT NOT NULL,
                code TEXT NOT NULL DEFAULT '',
                percentage INTEGER NOT NULL DEFAULT 0,
                short_bio TEXT NOT NULL DEFAULT '',
                hero_text TEXT NOT NULL DEFAULT '',
                hero_description TEXT NOT NULL DEFAULT '',
                link TEXT NOT NULL DEFAULT '',
                bullet_point_1 TEXT NOT NULL DEFAULT '',
                bullet_point_2 TEXT NOT NULL DEFAULT '',
                bullet_point_3 TEXT NOT NULL DEFAULT '',
                bullet_point_4 TEXT NOT NULL DEFAULT '',
                metadata JSONB,
                published_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                UNIQUE (slug, locale)
             );
             CREATE INDEX IF NOT EXISTS influencers_document_id_idx
                 ON influencers (document_id);
             CREATE TABLE IF NOT EXISTS i18n_locales (
                 code TEXT PRIMARY KEY,
                 name TEXT NOT NULL DEFAULT ''
             );
             INSERT INTO i18n_locales (code, name)
                 VALUES ('en', 'English'), ('fr', 'French (France)')
                 ON CONFLICT (code) DO NOTHING;",
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}
