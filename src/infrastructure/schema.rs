//! Schema bootstrap for both backends.
//!
//! The applied version lives in `schema_version`. Version 1 is the first
//! `messages` table without the survey columns, version 2 adds them.

use crate::infrastructure::traits::StoreError;
use log::{info, warn};
use sqlx::postgres::PgConnection;
use sqlx::sqlite::SqliteConnection;

pub const SCHEMA_VERSION: i64 = 2;

/// Columns added in version 2, with their SQLite types.
pub const SURVEY_COLUMNS: [(&str, &str); 3] = [
    ("service_attitude", "INTEGER"),
    ("food_quality", "TEXT"),
    ("overall_rating", "TEXT"),
];

const SQLITE_CREATE_MESSAGES: &str = r#"
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        content TEXT NOT NULL,
        image TEXT,
        time TEXT NOT NULL,
        service_attitude INTEGER,
        food_quality TEXT,
        overall_rating TEXT
    )
"#;

const POSTGRES_CREATE_MESSAGES: &str = r#"
    CREATE TABLE IF NOT EXISTS messages (
        id BIGSERIAL PRIMARY KEY,
        category TEXT NOT NULL,
        content TEXT NOT NULL,
        image TEXT,
        time TEXT NOT NULL,
        service_attitude INTEGER,
        food_quality TEXT,
        overall_rating TEXT
    )
"#;

const CREATE_SCHEMA_VERSION: &str =
    "CREATE TABLE IF NOT EXISTS schema_version (version BIGINT NOT NULL)";

const SELECT_SCHEMA_VERSION: &str = "SELECT MAX(version) FROM schema_version";

/// Brings an embedded database up to [`SCHEMA_VERSION`].
///
/// Older files may carry a `messages` table that predates the survey columns;
/// missing ones are added. A column that cannot be added is logged and the
/// version is left unrecorded, so the migration is attempted again next time.
pub async fn bootstrap_sqlite(connection: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query(SQLITE_CREATE_MESSAGES)
        .execute(&mut *connection)
        .await?;
    sqlx::query(CREATE_SCHEMA_VERSION)
        .execute(&mut *connection)
        .await?;

    let applied: Option<i64> = sqlx::query_scalar(SELECT_SCHEMA_VERSION)
        .fetch_one(&mut *connection)
        .await?;
    if applied.unwrap_or(0) >= SCHEMA_VERSION {
        return Ok(());
    }

    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('messages')")
        .fetch_all(&mut *connection)
        .await?;

    let mut complete = true;
    for (column, column_type) in SURVEY_COLUMNS {
        if columns.iter().any(|existing| existing == column) {
            continue;
        }

        info!("adding column messages.{column}");
        let statement = format!("ALTER TABLE messages ADD COLUMN {column} {column_type}");
        if let Err(e) = sqlx::query(&statement).execute(&mut *connection).await {
            warn!("schema migration of messages.{column} failed: {e}");
            complete = false;
        }
    }

    if complete {
        record_version_sqlite(connection).await?;
        info!("embedded schema at version {SCHEMA_VERSION}");
    }

    Ok(())
}

async fn record_version_sqlite(connection: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(connection)
        .await?;
    Ok(())
}

/// Creates the networked schema. The table is always created with every
/// column, so there is nothing to migrate column by column.
pub async fn bootstrap_postgres(connection: &mut PgConnection) -> Result<(), StoreError> {
    sqlx::query(POSTGRES_CREATE_MESSAGES)
        .execute(&mut *connection)
        .await?;
    sqlx::query(CREATE_SCHEMA_VERSION)
        .execute(&mut *connection)
        .await?;

    let applied: Option<i64> = sqlx::query_scalar(SELECT_SCHEMA_VERSION)
        .fetch_one(&mut *connection)
        .await?;
    if applied.unwrap_or(0) < SCHEMA_VERSION {
        sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
            .bind(SCHEMA_VERSION)
            .execute(&mut *connection)
            .await?;
        info!("networked schema at version {SCHEMA_VERSION}");
    }

    Ok(())
}
