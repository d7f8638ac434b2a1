//! Database connection and pool management for the registry service.
//!
//! This module provides functionality to initialize and manage a SeaORM
//! connection pool (Postgres or SQLite) with configurable parameters, and to
//! apply the schema migrations.

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AppConfig;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {source}")]
    ConnectionFailed {
        #[from]
        source: sea_orm::DbErr,
    },
    #[error("Database connection timeout after {timeout_ms}ms")]
    ConnectionTimeout { timeout_ms: u64 },
    #[error("Invalid database configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Initializes a database connection pool with the given configuration.
///
/// Connection attempts are retried up to five times with exponential backoff
/// starting at 100ms. SQLite connections get foreign key enforcement switched
/// on so cascade deletes behave the same as on Postgres.
///
/// # Examples
///
/// ```no_run
/// use registry::{config::AppConfig, db::init_pool};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = AppConfig::default();
///     let db = init_pool(&config).await?;
///     Ok(())
/// }
/// ```
pub async fn init_pool(cfg: &AppConfig) -> Result<DatabaseConnection> {
    if cfg.database_url.is_empty() {
        return Err(DatabaseError::InvalidConfiguration {
            message: "Database URL cannot be empty".to_string(),
        }
        .into());
    }

    let mut opt = ConnectOptions::new(&cfg.database_url);
    opt.max_connections(cfg.db_max_connections)
        .acquire_timeout(Duration::from_millis(cfg.db_acquire_timeout_ms))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let max_retries = 5;
    let mut retry_delay = Duration::from_millis(100);

    for attempt in 1..=max_retries {
        match Database::connect(opt.clone()).await {
            Ok(conn) => {
                tracing::info!(attempt, "Connected to database");
                enable_foreign_keys(&conn).await?;
                return Ok(conn);
            }
            Err(e) => {
                if attempt == max_retries {
                    tracing::error!(
                        attempts = max_retries,
                        error = %e,
                        "Failed to connect to database"
                    );
                    return Err(DatabaseError::ConnectionFailed { source: e }.into());
                }

                tracing::warn!(
                    attempt,
                    error = %e,
                    retry_in = ?retry_delay,
                    "Database connection attempt failed, retrying"
                );

                sleep(retry_delay).await;
                retry_delay *= 2;
            }
        }
    }

    Err(DatabaseError::ConnectionTimeout {
        timeout_ms: cfg.db_acquire_timeout_ms,
    }
    .into())
}

/// Turns on foreign key enforcement for SQLite; a no-op for other backends.
pub async fn enable_foreign_keys(db: &DatabaseConnection) -> Result<()> {
    if db.get_database_backend() == DatabaseBackend::Sqlite {
        db.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "PRAGMA foreign_keys = ON".to_string(),
        ))
        .await
        .context("Failed to enable SQLite foreign keys")?;
    }
    Ok(())
}

/// Applies all pending schema migrations.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .context("Failed to apply database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Health check for the database connection.
pub async fn health_check(db: &DatabaseConnection) -> Result<()> {
    db.ping().await.context("Database health check failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_database_url() {
        let config = AppConfig {
            database_url: "".to_string(),
            ..Default::default()
        };

        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(init_pool(&config));

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err().downcast::<DatabaseError>(),
            Ok(DatabaseError::InvalidConfiguration { .. })
        ));
    }

    #[tokio::test]
    async fn test_sqlite_pool_migrates_and_passes_health_check() {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            ..Default::default()
        };

        let db = init_pool(&config).await.unwrap();
        run_migrations(&db).await.unwrap();
        health_check(&db).await.unwrap();

        let row = db
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "PRAGMA foreign_keys".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        let enabled: i32 = row.try_get_by_index(0).unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_health_check_fails_on_disconnected_handle() {
        let db = DatabaseConnection::default();

        let err = health_check(&db).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<sea_orm::DbErr>(),
            Some(sea_orm::DbErr::Conn(_))
        ));
    }
}
