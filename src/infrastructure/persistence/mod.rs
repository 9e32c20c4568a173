use crate::domain::errors::{DomainError, DomainResult};
use sqlx::{
    any::{AnyConnectOptions, AnyPoolOptions, AnyQueryResult, AnyRow},
    AnyPool, ConnectOptions, Row,
};
use std::str::FromStr;
use tracing::log::LevelFilter;

mod awards;
mod education;
mod posts;
mod roles;
mod users;

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: AnyPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        // Ensure drivers are installed for AnyPool
        sqlx::any::install_default_drivers();

        let mut connect_options = AnyConnectOptions::from_str(database_url)?;

        connect_options = connect_options
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, std::time::Duration::from_secs(1));

        let pool = AnyPoolOptions::new()
            .max_connections(20)
            .min_connections(1)
            .connect_with(connect_options)
            .await?;

        if database_url.starts_with("sqlite") {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await?;
            sqlx::query("PRAGMA busy_timeout = 5000")
                .execute(&pool)
                .await?;
            sqlx::query("PRAGMA foreign_keys = ON")
                .execute(&pool)
                .await?;
        }

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("migrations/sqlite").run(&self.pool).await
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

/// Row id of a single-row INSERT. Every table keys on an INTEGER PRIMARY KEY,
/// so the rowid is the id.
pub(crate) fn inserted_id(result: &AnyQueryResult) -> DomainResult<i64> {
    result
        .last_insert_id()
        .ok_or_else(|| DomainError::Internal("Insert did not report a row id".to_string()))
}

/// Reads a nullable TEXT column. The Any driver refuses to decode NULL into
/// `Option<String>`, so a failed decode is treated as NULL.
pub(crate) fn optional_text(row: &AnyRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column).ok().flatten()
}
