//! Infrastructure traits, used for DI on higher levels

use crate::infrastructure::entities;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database unreachable after {attempts} attempts: {reason}")]
    Unreachable { attempts: u32, reason: String },

    #[error("invalid connection string: {0}")]
    InvalidUrl(String),
}

/// Storage gateway over one of the supported backends.
///
/// Every operation acquires its own connection and releases it before returning.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Creates or upgrades the schema. Safe to call any number of times.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Stores a message and returns its id.
    async fn insert_message(&self, message: entities::NewMessage) -> Result<i64, StoreError>;

    /// All stored messages, newest first.
    async fn list_messages(&self) -> Result<Vec<entities::Message>, StoreError>;
}
