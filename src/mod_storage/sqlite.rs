use async_trait::async_trait;
use sqlx::AnyPool;
use tracing::debug;

use super::{ModStorageEntry, ModStore};
use crate::error::{DbError, Result};

#[derive(Clone)]
pub struct SqliteModStorageRepository {
    pool: AnyPool,
}

impl SqliteModStorageRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModStore for SqliteModStorageRepository {
    async fn get(&self, modname: &str, key: &[u8]) -> Result<Option<ModStorageEntry>> {
        let entry = sqlx::query_as::<_, ModStorageEntry>(
            "SELECT modname, key, value FROM entries WHERE modname = ? AND key = ?",
        )
        .bind(modname)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn create(&self, entry: &ModStorageEntry) -> Result<()> {
        sqlx::query("INSERT INTO entries (modname, key, value) VALUES (?, ?, ?)")
            .bind(entry.modname.as_str())
            .bind(entry.key.as_slice())
            .bind(entry.value.as_slice())
            .execute(&self.pool)
            .await
            .map_err(DbError::on_write("entries"))?;

        debug!(table = "entries", modname = %entry.modname, "entry created");
        Ok(())
    }

    async fn update(&self, entry: &ModStorageEntry) -> Result<()> {
        let res = sqlx::query("UPDATE entries SET value = ? WHERE modname = ? AND key = ?")
            .bind(entry.value.as_slice())
            .bind(entry.modname.as_str())
            .bind(entry.key.as_slice())
            .execute(&self.pool)
            .await?;

        debug!(
            table = "entries",
            modname = %entry.modname,
            affected = res.rows_affected(),
            "entry updated"
        );
        Ok(())
    }

    async fn delete(&self, modname: &str, key: &[u8]) -> Result<()> {
        let res = sqlx::query("DELETE FROM entries WHERE modname = ? AND key = ?")
            .bind(modname)
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(table = "entries", modname, affected = res.rows_affected(), "entry deleted");
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
