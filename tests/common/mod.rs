#![allow(dead_code)]

use playerdb::DatabaseType;
use playerdb::config::DatabaseConfig;
use sqlx::AnyPool;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::sync::Mutex;

/// Set to a postgres URL to run the postgres variants of the tests.
pub const POSTGRES_URL_ENV: &str = "PLAYERDB_TEST_POSTGRES_URL";

/// A SQLite database in a fresh temp file.
pub struct TempSqlite {
    pub pool: AnyPool,
    pub path: PathBuf,
}

impl TempSqlite {
    pub async fn new(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        SystemTime::now().hash(&mut hasher);
        std::process::id().hash(&mut hasher);
        name.hash(&mut hasher);
        let path = std::env::temp_dir().join(format!("test_{name}_{:016x}.sqlite", hasher.finish()));

        let pool = open_sqlite(&path, "rwc", 4).await;
        Self { pool, path }
    }

    /// A second, independent pool on the same file. Its connections see
    /// only what was persisted, not per-connection state of `self.pool`.
    pub async fn reopen(&self, mode: &str, max_connections: u32) -> AnyPool {
        open_sqlite(&self.path, mode, max_connections).await
    }

    /// Creates the database and brings it to the current schema with WAL on.
    pub async fn migrated(name: &str) -> Self {
        let db = Self::new(name).await;
        playerdb::db::setup(&db.pool, DatabaseType::Sqlite)
            .await
            .unwrap();
        db
    }

    pub async fn cleanup(self) {
        self.pool.close().await;
        let wal_path = PathBuf::from(format!("{}-wal", self.path.to_string_lossy()));
        let shm_path = PathBuf::from(format!("{}-shm", self.path.to_string_lossy()));
        let _ = fs::remove_file(&wal_path).await;
        let _ = fs::remove_file(&shm_path).await;
        fs::remove_file(&self.path).await.unwrap();
    }
}

async fn open_sqlite(path: &Path, mode: &str, max_connections: u32) -> AnyPool {
    let cfg = DatabaseConfig {
        backend: DatabaseType::Sqlite,
        url: format!("sqlite://{}?mode={mode}", path.to_str().unwrap()),
        max_connections,
        wal: true,
    };
    playerdb::db::connect(&cfg).await.unwrap()
}

static POSTGRES_MIGRATE: Mutex<()> = Mutex::const_new(());

/// A migrated postgres pool, or `None` when no test server is configured.
pub async fn postgres() -> Option<AnyPool> {
    let url = std::env::var(POSTGRES_URL_ENV).ok()?;
    let cfg = DatabaseConfig {
        backend: DatabaseType::Postgres,
        url,
        max_connections: 4,
        wal: false,
    };
    let pool = playerdb::db::connect(&cfg).await.unwrap();

    // Tests in one binary run concurrently; racing CREATE TABLEs would fail the loser.
    let _guard = POSTGRES_MIGRATE.lock().await;
    playerdb::db::setup(&pool, DatabaseType::Postgres)
        .await
        .unwrap();
    Some(pool)
}

/// A name no other test run will have used.
pub fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    format!("{prefix}_{}_{nanos}", std::process::id())
}
