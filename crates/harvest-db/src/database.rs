use harvest_core::models::{ScrapeConfig, ScrapeUrl, ScrapingJob};
use harvest_core::{AppError, DatabaseErrorKind};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::DatabaseConfig;
use crate::error::{Operation, translate};
use crate::repository::Repository;

pub type ConfigRepository = Repository<ScrapeConfig>;
pub type JobRepository = Repository<ScrapingJob>;
pub type UrlRepository = Repository<ScrapeUrl>;

/// Central database facade: owns the connection pool, runs migrations,
/// and vends repository instances.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL with the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::database(
                    DatabaseErrorKind::Unavailable,
                    "Could not connect to the database.",
                    e,
                )
            })?;

        tracing::info!(
            max_connections = config.max_connections,
            "Database pool ready"
        );
        Ok(Self { pool })
    }

    /// Create a `Database` from an existing pool (useful for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create any missing tables. Safe to run on every start.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(DatabaseErrorKind::Unavailable, "Migration failed.", e)
            })?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }

    /// Round-trip a trivial statement to confirm the store is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| translate("Database", Operation::HealthCheck, e))?;
        Ok(())
    }

    pub fn config_repo(&self) -> ConfigRepository {
        Repository::new(self.pool.clone())
    }

    pub fn job_repo(&self) -> JobRepository {
        Repository::new(self.pool.clone())
    }

    pub fn url_repo(&self) -> UrlRepository {
        Repository::new(self.pool.clone())
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
