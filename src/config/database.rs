use serde::{Deserialize, Serialize};

use crate::db::DatabaseType;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Which engine `url` points at.
    /// TOML: `database.backend` (`sqlite` or `postgres`). Default: `sqlite`.
    #[serde(default = "default_backend")]
    pub backend: DatabaseType,

    /// Connection URL handed to the driver.
    /// TOML: `database.url`. Default: `sqlite://auth.sqlite?mode=rwc`.
    #[serde(default = "default_url")]
    pub url: String,

    /// TOML: `database.max_connections`. Default: `5`.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Switch the embedded engine to write-ahead logging after migrating.
    /// TOML: `database.wal`. Default: `true`. Ignored for postgres.
    #[serde(default = "default_wal")]
    pub wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: default_url(),
            max_connections: default_max_connections(),
            wal: default_wal(),
        }
    }
}

fn default_backend() -> DatabaseType {
    DatabaseType::Sqlite
}

fn default_url() -> String {
    "sqlite://auth.sqlite?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_wal() -> bool {
    true
}
