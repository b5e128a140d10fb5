//! Account records and privilege memberships.
//!
//! Each repository is a closed enum with one implementation per backend;
//! the variant is picked from the caller's [`DatabaseType`] at construction.
//! Lookups return `Ok(None)` (or an empty list) when nothing matches.
//! Updates and deletes do not report whether a row was actually touched;
//! callers that care must look the row up first.

mod postgres;
mod sqlite;

pub use postgres::{PostgresAuthRepository, PostgresPrivilegeRepository};
pub use sqlite::{SqliteAuthRepository, SqlitePrivilegeRepository};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{AnyPool, FromRow};

use crate::db::DatabaseType;
use crate::error::Result;

/// One account, as stored in the `auth` table.
///
/// `password` is an opaque credential string (`#1#<salt>#<verifier>` for
/// SRP accounts); it is stored and returned verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AuthEntry {
    /// `None` until [`AuthStore::create`] assigns the backend's key.
    pub id: Option<i64>,
    pub name: String,
    pub password: String,
    /// Unix epoch seconds.
    pub last_login: i64,
}

/// One (account, privilege) pair from `user_privileges`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct PrivilegeEntry {
    pub id: i64,
    pub privilege: String,
}

#[async_trait]
pub trait AuthStore {
    async fn get_by_username(&self, name: &str) -> Result<Option<AuthEntry>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<AuthEntry>>;

    /// Inserts the entry and writes the assigned key back into `entry.id`.
    async fn create(&self, entry: &mut AuthEntry) -> Result<()>;

    /// Overwrites name, password and last login of the row keyed by `entry.id`.
    async fn update(&self, entry: &AuthEntry) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;

    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait PrivilegeStore {
    /// All privileges held by the account, in no particular order.
    async fn get_by_id(&self, id: i64) -> Result<Vec<PrivilegeEntry>>;

    async fn create(&self, entry: &PrivilegeEntry) -> Result<()>;

    async fn delete(&self, id: i64, privilege: &str) -> Result<()>;
}

#[derive(Clone)]
pub enum AuthRepository {
    Sqlite(SqliteAuthRepository),
    Postgres(PostgresAuthRepository),
}

impl AuthRepository {
    pub fn new(pool: AnyPool, db_type: DatabaseType) -> Self {
        match db_type {
            DatabaseType::Sqlite => AuthRepository::Sqlite(SqliteAuthRepository::new(pool)),
            DatabaseType::Postgres => AuthRepository::Postgres(PostgresAuthRepository::new(pool)),
        }
    }
}

#[async_trait]
impl AuthStore for AuthRepository {
    async fn get_by_username(&self, name: &str) -> Result<Option<AuthEntry>> {
        match self {
            AuthRepository::Sqlite(r) => r.get_by_username(name).await,
            AuthRepository::Postgres(r) => r.get_by_username(name).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<AuthEntry>> {
        match self {
            AuthRepository::Sqlite(r) => r.get_by_id(id).await,
            AuthRepository::Postgres(r) => r.get_by_id(id).await,
        }
    }

    async fn create(&self, entry: &mut AuthEntry) -> Result<()> {
        match self {
            AuthRepository::Sqlite(r) => r.create(entry).await,
            AuthRepository::Postgres(r) => r.create(entry).await,
        }
    }

    async fn update(&self, entry: &AuthEntry) -> Result<()> {
        match self {
            AuthRepository::Sqlite(r) => r.update(entry).await,
            AuthRepository::Postgres(r) => r.update(entry).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self {
            AuthRepository::Sqlite(r) => r.delete(id).await,
            AuthRepository::Postgres(r) => r.delete(id).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self {
            AuthRepository::Sqlite(r) => r.count().await,
            AuthRepository::Postgres(r) => r.count().await,
        }
    }
}

#[derive(Clone)]
pub enum PrivilegeRepository {
    Sqlite(SqlitePrivilegeRepository),
    Postgres(PostgresPrivilegeRepository),
}

impl PrivilegeRepository {
    pub fn new(pool: AnyPool, db_type: DatabaseType) -> Self {
        match db_type {
            DatabaseType::Sqlite => {
                PrivilegeRepository::Sqlite(SqlitePrivilegeRepository::new(pool))
            }
            DatabaseType::Postgres => {
                PrivilegeRepository::Postgres(PostgresPrivilegeRepository::new(pool))
            }
        }
    }
}

#[async_trait]
impl PrivilegeStore for PrivilegeRepository {
    async fn get_by_id(&self, id: i64) -> Result<Vec<PrivilegeEntry>> {
        match self {
            PrivilegeRepository::Sqlite(r) => r.get_by_id(id).await,
            PrivilegeRepository::Postgres(r) => r.get_by_id(id).await,
        }
    }

    async fn create(&self, entry: &PrivilegeEntry) -> Result<()> {
        match self {
            PrivilegeRepository::Sqlite(r) => r.create(entry).await,
            PrivilegeRepository::Postgres(r) => r.create(entry).await,
        }
    }

    async fn delete(&self, id: i64, privilege: &str) -> Result<()> {
        match self {
            PrivilegeRepository::Sqlite(r) => r.delete(id, privilege).await,
            PrivilegeRepository::Postgres(r) => r.delete(id, privilege).await,
        }
    }
}
