use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.db_idle_timeout_seconds))
            .max_lifetime(Duration::from_secs(config.db_max_lifetime_seconds))
            .connect(&config.database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Bring the schema up to date with the migrations in `dir`. Applied
    /// versions are recorded by sqlx, so each script runs once.
    pub async fn migrate(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let migrator = Migrator::new(dir)
            .await
            .map_err(|err| anyhow!("cannot load migrations from {}: {}", dir.display(), err))?;
        migrator
            .run(&self.pool)
            .await
            .map_err(|err| anyhow!("migration failed: {}", err))?;

        tracing::info!(
            dir = %dir.display(),
            migrations = migrator.iter().count(),
            "schema up to date"
        );
        Ok(())
    }
}
