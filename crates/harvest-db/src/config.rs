use std::time::Duration;

use harvest_core::AppError;

/// Configuration for the database connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Read configuration from environment variables.
    ///
    /// - `DATABASE_URL` (required)
    /// - `DATABASE_MAX_CONNECTIONS` (optional, defaults to 5)
    /// - `DATABASE_ACQUIRE_TIMEOUT_SECS` (optional, defaults to 30)
    pub fn from_env() -> Result<Self, AppError> {
        let url = std::env::var("DATABASE_URL").map_err(|_| {
            AppError::operation(
                "Configuration",
                "failed: DATABASE_URL not set. Required for database operations.",
            )
        })?;

        Self::with_pool_env(url)
    }

    /// Use `url` as given; read only the pool settings from the environment.
    pub fn with_pool_env(url: impl Into<String>) -> Result<Self, AppError> {
        let max_connections = positive_from_env("DATABASE_MAX_CONNECTIONS", 5)?;
        let acquire_timeout = positive_from_env("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?;

        Ok(Self {
            url: url.into(),
            max_connections,
            acquire_timeout: Duration::from_secs(u64::from(acquire_timeout)),
        })
    }
}

fn positive_from_env(name: &str, default: u32) -> Result<u32, AppError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => parse_positive(name, &raw),
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u32, AppError> {
    let parsed: u32 = raw.trim().parse().map_err(|_| {
        AppError::operation(
            "Configuration",
            format!("failed: invalid {name} '{raw}': must be a positive integer"),
        )
    })?;
    if parsed == 0 {
        return Err(AppError::operation(
            "Configuration",
            format!("failed: {name} must be at least 1"),
        ));
    }
    Ok(parsed)
}
