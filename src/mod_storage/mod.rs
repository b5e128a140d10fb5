//! Key/value storage for server mods (the `entries` table).

mod postgres;
mod sqlite;

pub use postgres::PostgresModStorageRepository;
pub use sqlite::SqliteModStorageRepository;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{AnyPool, FromRow};

use crate::db::DatabaseType;
use crate::error::Result;

/// A value stored by a mod under `(modname, key)`. Key and value are raw bytes;
/// mod names are identifiers and kept as text, as the game server stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ModStorageEntry {
    pub modname: String,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

#[async_trait]
pub trait ModStore {
    async fn get(&self, modname: &str, key: &[u8]) -> Result<Option<ModStorageEntry>>;

    async fn create(&self, entry: &ModStorageEntry) -> Result<()>;

    /// Overwrites the value of an existing `(modname, key)` pair.
    async fn update(&self, entry: &ModStorageEntry) -> Result<()>;

    async fn delete(&self, modname: &str, key: &[u8]) -> Result<()>;

    async fn count(&self) -> Result<i64>;
}

#[derive(Clone)]
pub enum ModStorageRepository {
    Sqlite(SqliteModStorageRepository),
    Postgres(PostgresModStorageRepository),
}

impl ModStorageRepository {
    pub fn new(pool: AnyPool, db_type: DatabaseType) -> Self {
        match db_type {
            DatabaseType::Sqlite => {
                ModStorageRepository::Sqlite(SqliteModStorageRepository::new(pool))
            }
            DatabaseType::Postgres => {
                ModStorageRepository::Postgres(PostgresModStorageRepository::new(pool))
            }
        }
    }
}

#[async_trait]
impl ModStore for ModStorageRepository {
    async fn get(&self, modname: &str, key: &[u8]) -> Result<Option<ModStorageEntry>> {
        match self {
            ModStorageRepository::Sqlite(r) => r.get(modname, key).await,
            ModStorageRepository::Postgres(r) => r.get(modname, key).await,
        }
    }

    async fn create(&self, entry: &ModStorageEntry) -> Result<()> {
        match self {
            ModStorageRepository::Sqlite(r) => r.create(entry).await,
            ModStorageRepository::Postgres(r) => r.create(entry).await,
        }
    }

    async fn update(&self, entry: &ModStorageEntry) -> Result<()> {
        match self {
            ModStorageRepository::Sqlite(r) => r.update(entry).await,
            ModStorageRepository::Postgres(r) => r.update(entry).await,
        }
    }

    async fn delete(&self, modname: &str, key: &[u8]) -> Result<()> {
        match self {
            ModStorageRepository::Sqlite(r) => r.delete(modname, key).await,
            ModStorageRepository::Postgres(r) => r.delete(modname, key).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self {
            ModStorageRepository::Sqlite(r) => r.count().await,
            ModStorageRepository::Postgres(r) => r.count().await,
        }
    }
}
