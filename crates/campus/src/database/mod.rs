//! SQLite persistence using `SQLx`
//!
//! This module provides the production repositories with:
//! - Connection pooling with bounded retry on start-up
//! - Simple embedded schema (no migration files)
//! - Driver errors logged, then reported as a generic internal failure

use std::time::Duration;

use campus_core::{Error, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;

mod course;
mod person;
mod query;
mod schema;

pub use course::SqlCourseRepository;
pub use person::SqlPersonRepository;

/// Message clients see for any storage failure
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error, check log for details";

/// Log a driver error with context and classify it as internal.
pub(crate) fn log_db_err(context: &str, err: &sqlx::Error) -> Error {
    debug!(error = %err, "{context}");
    Error::internal(INTERNAL_SERVER_ERROR)
}

/// A stored value that does not fit its domain type.
pub(crate) fn invalid_column(column: &str, value: &dyn std::fmt::Display) -> Error {
    debug!(column, %value, "Stored value out of range");
    Error::internal(INTERNAL_SERVER_ERROR)
}

/// Connection pool shared by the repositories
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect, retrying on failure, and make sure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` once every attempt has failed or if the
    /// schema cannot be created.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = connect_with_retry(config).await?;
        schema::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn persons(&self) -> SqlPersonRepository {
        SqlPersonRepository::new(self.pool.clone())
    }

    pub fn courses(&self) -> SqlCourseRepository {
        SqlCourseRepository::new(self.pool.clone())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn connect_with_retry(config: &DatabaseConfig) -> Result<SqlitePool> {
    let attempts = config.connect_attempts.max(1);
    let delay = Duration::from_millis(config.retry_delay_ms);
    let mut attempt = 1;

    loop {
        match SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
        {
            Ok(pool) => {
                info!(attempt, "Connected to database");
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                warn!(attempt, attempts, error = %e, "Database connection failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(log_db_err("Failed to connect to database", &e)),
        }
    }
}
