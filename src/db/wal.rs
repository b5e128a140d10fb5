use sqlx::AnyPool;
use tracing::info;

use crate::db::dialect::DatabaseType;
use crate::error::{DbError, Result};

/// Switches the embedded engine's journal to write-ahead logging.
///
/// The mode is persisted in the database file, so calling this again is
/// harmless. Postgres manages its own durability and is left alone.
pub async fn enable_wal(pool: &AnyPool, db_type: DatabaseType) -> Result<()> {
    match db_type {
        DatabaseType::Sqlite => {
            let mode: String = sqlx::query_scalar("PRAGMA journal_mode = WAL")
                .fetch_one(pool)
                .await?;
            if !mode.eq_ignore_ascii_case("wal") {
                return Err(DbError::JournalMode { actual: mode });
            }
            info!(journal_mode = %mode, "write-ahead log enabled");
            Ok(())
        }
        DatabaseType::Postgres => Ok(()),
    }
}
