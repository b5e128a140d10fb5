//! Backend selection and the SQL differences between the supported engines.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::DbError;

/// The backend a pool is connected to.
///
/// This is caller-asserted: nothing here inspects the pool to find out
/// which engine is really on the other end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DatabaseType {
    /// Embedded single-file engine (SQLite).
    Sqlite,
    /// Client/server engine (PostgreSQL).
    Postgres,
}

impl DatabaseType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DatabaseType::Sqlite => "sqlite",
            DatabaseType::Postgres => "postgres",
        }
    }

    /// Positional placeholder for the 1-based parameter `n`.
    pub fn placeholder(self, n: usize) -> String {
        match self {
            DatabaseType::Sqlite => "?".to_string(),
            DatabaseType::Postgres => format!("${n}"),
        }
    }

    /// Surrogate key column declaration for auto-assigned integer ids.
    pub const fn autoincrement_pk(self) -> &'static str {
        match self {
            DatabaseType::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
            DatabaseType::Postgres => "BIGSERIAL PRIMARY KEY",
        }
    }

    pub const fn blob_type(self) -> &'static str {
        match self {
            DatabaseType::Sqlite => "BLOB",
            DatabaseType::Postgres => "BYTEA",
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(DatabaseType::Sqlite),
            "postgres" | "postgresql" => Ok(DatabaseType::Postgres),
            _ => Err(DbError::UnsupportedBackend(s.to_string())),
        }
    }
}

impl TryFrom<String> for DatabaseType {
    type Error = DbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DatabaseType> for String {
    fn from(value: DatabaseType) -> Self {
        value.as_str().to_string()
    }
}
