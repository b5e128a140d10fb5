use async_trait::async_trait;
use sqlx::AnyPool;
use tracing::debug;

use super::{AuthEntry, AuthStore, PrivilegeEntry, PrivilegeStore};
use crate::error::{DbError, Result};

#[derive(Clone)]
pub struct SqliteAuthRepository {
    pool: AnyPool,
}

impl SqliteAuthRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthStore for SqliteAuthRepository {
    async fn get_by_username(&self, name: &str) -> Result<Option<AuthEntry>> {
        let entry = sqlx::query_as::<_, AuthEntry>(
            "SELECT id, name, password, last_login FROM auth WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<AuthEntry>> {
        let entry = sqlx::query_as::<_, AuthEntry>(
            "SELECT id, name, password, last_login FROM auth WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn create(&self, entry: &mut AuthEntry) -> Result<()> {
        // The Any driver does not surface SQLite's last-insert rowid.
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO auth (name, password, last_login) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(entry.name.as_str())
        .bind(entry.password.as_str())
        .bind(entry.last_login)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::on_write("auth"))?;
        entry.id = Some(id);

        debug!(table = "auth", id, "entry created");
        Ok(())
    }

    async fn update(&self, entry: &AuthEntry) -> Result<()> {
        let id = entry.id.ok_or(DbError::MissingId)?;
        let res = sqlx::query("UPDATE auth SET name = ?, password = ?, last_login = ? WHERE id = ?")
            .bind(entry.name.as_str())
            .bind(entry.password.as_str())
            .bind(entry.last_login)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::on_write("auth"))?;

        debug!(table = "auth", id, affected = res.rows_affected(), "entry updated");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM auth WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(table = "auth", id, affected = res.rows_affected(), "entry deleted");
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Clone)]
pub struct SqlitePrivilegeRepository {
    pool: AnyPool,
}

impl SqlitePrivilegeRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrivilegeStore for SqlitePrivilegeRepository {
    async fn get_by_id(&self, id: i64) -> Result<Vec<PrivilegeEntry>> {
        let rows = sqlx::query_as::<_, PrivilegeEntry>(
            "SELECT id, privilege FROM user_privileges WHERE id = ?",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, entry: &PrivilegeEntry) -> Result<()> {
        sqlx::query("INSERT INTO user_privileges (id, privilege) VALUES (?, ?)")
            .bind(entry.id)
            .bind(entry.privilege.as_str())
            .execute(&self.pool)
            .await
            .map_err(DbError::on_write("user_privileges"))?;

        debug!(table = "user_privileges", id = entry.id, privilege = %entry.privilege, "entry created");
        Ok(())
    }

    async fn delete(&self, id: i64, privilege: &str) -> Result<()> {
        let res = sqlx::query("DELETE FROM user_privileges WHERE id = ? AND privilege = ?")
            .bind(id)
            .bind(privilege)
            .execute(&self.pool)
            .await?;

        debug!(
            table = "user_privileges",
            id,
            privilege,
            affected = res.rows_affected(),
            "entry deleted"
        );
        Ok(())
    }
}
