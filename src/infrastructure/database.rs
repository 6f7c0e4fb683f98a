//! Backend selection and per-request SQLite / PostgreSQL connections

use crate::config::AppConfig;
use crate::infrastructure::traits::StoreError;
use log::warn;
use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use std::str::FromStr;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// How long an embedded write waits for a concurrent writer to finish.
const WRITER_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Single-file SQLite database.
    Embedded,
    /// PostgreSQL server.
    Networked,
}

impl BackendKind {
    /// Networked iff a connection string is set and does not name SQLite.
    pub fn select(database_url: Option<&str>) -> BackendKind {
        match database_url.map(str::trim) {
            Some(url) if !url.is_empty() && !url.starts_with("sqlite") => BackendKind::Networked,
            _ => BackendKind::Embedded,
        }
    }
}

pub struct EmbeddedDatabase {
    options: SqliteConnectOptions,
}

impl EmbeddedDatabase {
    pub fn create(config: &AppConfig) -> Result<EmbeddedDatabase, StoreError> {
        let options = match config.database_url.as_deref() {
            Some(url) if url.starts_with("sqlite") => SqliteConnectOptions::from_str(url)
                .map_err(|e| StoreError::InvalidUrl(e.to_string()))?,
            _ => SqliteConnectOptions::new().filename(config.database_path()),
        };

        Ok(EmbeddedDatabase {
            options: options
                .create_if_missing(true)
                .busy_timeout(WRITER_BUSY_TIMEOUT),
        })
    }

    pub async fn acquire_connection(&self) -> Result<SqliteConnection, StoreError> {
        Ok(self.options.connect().await?)
    }
}

pub struct NetworkedDatabase {
    options: PgConnectOptions,
    attempts: u32,
    connect_timeout: Duration,
    backoff: Duration,
}

impl NetworkedDatabase {
    pub fn create(config: &AppConfig) -> Result<NetworkedDatabase, StoreError> {
        let url = config.database_url.as_deref().unwrap_or_default();
        let options =
            PgConnectOptions::from_str(url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;

        Ok(NetworkedDatabase {
            options,
            attempts: config.connect_attempts.max(1),
            connect_timeout: config.connect_timeout,
            backoff: config.retry_backoff,
        })
    }

    /// Connects with a bounded number of attempts, each with its own timeout.
    pub async fn acquire_connection(&self) -> Result<PgConnection, StoreError> {
        let mut reason = String::new();

        for attempt in 1..=self.attempts {
            match timeout(self.connect_timeout, self.options.connect()).await {
                Ok(Ok(connection)) => return Ok(connection),
                Ok(Err(e)) => reason = e.to_string(),
                Err(_) => reason = format!("timed out after {:?}", self.connect_timeout),
            }

            warn!(
                "database connection attempt {attempt}/{} failed: {reason}",
                self.attempts
            );
            if attempt < self.attempts {
                sleep(self.backoff).await;
            }
        }

        Err(StoreError::Unreachable {
            attempts: self.attempts,
            reason,
        })
    }
}
