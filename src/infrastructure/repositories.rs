//! DB Repository abstractions

use crate::config::AppConfig;
use crate::infrastructure::database::{BackendKind, EmbeddedDatabase, NetworkedDatabase};
use crate::infrastructure::entities::{Message, NewMessage};
use crate::infrastructure::schema;
use crate::infrastructure::traits::{MessageRepository, StoreError};
use async_trait::async_trait;
use di::Ref;
use log::{info, warn};
use sqlx::Connection;

const SELECT_MESSAGES: &str = "SELECT id, category, content, image, time, service_attitude, food_quality, overall_rating FROM messages ORDER BY id DESC";

/// Builds the repository for the configured backend. Called once at startup.
pub fn open_repository(config: &AppConfig) -> Result<Ref<dyn MessageRepository>, StoreError> {
    let repository: Ref<dyn MessageRepository> =
        match BackendKind::select(config.database_url.as_deref()) {
            BackendKind::Embedded => {
                info!(
                    "using embedded database {}",
                    config
                        .database_url
                        .clone()
                        .unwrap_or_else(|| config.database_path().display().to_string())
                );
                Ref::new(SqliteMessageRepository {
                    database: EmbeddedDatabase::create(config)?,
                })
            }
            BackendKind::Networked => {
                info!("using networked database");
                Ref::new(PgMessageRepository {
                    database: NetworkedDatabase::create(config)?,
                })
            }
        };

    Ok(repository)
}

/// Startup schema bootstrap. The store may not be reachable yet, so a failure
/// is only logged and every request bootstraps the schema again.
pub async fn prepare_schema(repository: &dyn MessageRepository) -> bool {
    match repository.ensure_schema().await {
        Ok(()) => true,
        Err(e) => {
            warn!("schema bootstrap failed, retrying on first request: {e}");
            false
        }
    }
}

/// Closes a connection whose work is already committed or abandoned.
async fn release<C: Connection>(connection: C) {
    if let Err(e) = connection.close().await {
        warn!("failed to close database connection: {e}");
    }
}

pub struct SqliteMessageRepository {
    database: EmbeddedDatabase,
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut connection = self.database.acquire_connection().await?;
        schema::bootstrap_sqlite(&mut connection).await?;
        release(connection).await;
        Ok(())
    }

    // The bootstrap runs in autocommit mode before `begin()`. A deferred
    // transaction that reads `schema_version` and then writes cannot upgrade
    // its lock while another writer is active, and SQLite fails it with
    // SQLITE_BUSY instead of waiting.
    async fn insert_message(&self, message: NewMessage) -> Result<i64, StoreError> {
        let mut connection = self.database.acquire_connection().await?;
        schema::bootstrap_sqlite(&mut connection).await?;
        let mut tx = connection.begin().await?;

        let id = sqlx::query_scalar(
            "INSERT INTO messages (category, content, image, time, service_attitude, food_quality, overall_rating) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(message.category)
        .bind(message.content)
        .bind(message.image)
        .bind(message.time)
        .bind(message.service_attitude)
        .bind(message.food_quality)
        .bind(message.overall_rating)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        release(connection).await;
        Ok(id)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, StoreError> {
        let mut connection = self.database.acquire_connection().await?;
        schema::bootstrap_sqlite(&mut connection).await?;
        let mut tx = connection.begin().await?;

        let messages = sqlx::query_as(SELECT_MESSAGES)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        release(connection).await;
        Ok(messages)
    }
}

pub struct PgMessageRepository {
    database: NetworkedDatabase,
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut connection = self.database.acquire_connection().await?;
        let mut tx = connection.begin().await?;
        schema::bootstrap_postgres(&mut tx).await?;
        tx.commit().await?;
        release(connection).await;
        Ok(())
    }

    async fn insert_message(&self, message: NewMessage) -> Result<i64, StoreError> {
        let mut connection = self.database.acquire_connection().await?;
        let mut tx = connection.begin().await?;
        schema::bootstrap_postgres(&mut tx).await?;

        let id = sqlx::query_scalar(
            "INSERT INTO messages (category, content, image, time, service_attitude, food_quality, overall_rating) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(message.category)
        .bind(message.content)
        .bind(message.image)
        .bind(message.time)
        .bind(message.service_attitude)
        .bind(message.food_quality)
        .bind(message.overall_rating)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        release(connection).await;
        Ok(id)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, StoreError> {
        let mut connection = self.database.acquire_connection().await?;
        let mut tx = connection.begin().await?;
        schema::bootstrap_postgres(&mut tx).await?;

        let messages = sqlx::query_as(SELECT_MESSAGES)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        release(connection).await;
        Ok(messages)
    }
}
