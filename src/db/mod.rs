//! Database module: dialects, schema, migrations and connection setup.
//!
//! Layout:
//! - `dialect.rs`: `DatabaseType`, the per-backend SQL differences
//! - `schema.rs`: SQL DDL for every table, rendered per dialect
//! - `migrate.rs`: versioned, transactional schema migrator
//! - `wal.rs`: write-ahead-log switch for the embedded engine

pub mod dialect;
pub mod migrate;
pub mod schema;
pub mod wal;

pub use dialect::DatabaseType;
pub use migrate::{
    AppliedStep, MigrationReport, migrate, migrate_auth, migrate_mod_storage,
};
pub use wal::enable_wal;

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Opens a pool for the configured backend.
pub async fn connect(cfg: &DatabaseConfig) -> Result<AnyPool> {
    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect(&cfg.url)
        .await?;

    info!(
        backend = %cfg.backend,
        max_connections = cfg.max_connections,
        "database pool opened"
    );
    Ok(pool)
}

/// Migrates the schema and then enables the write-ahead log.
///
/// Run once per process before constructing repositories.
pub async fn setup(pool: &AnyPool, db_type: DatabaseType) -> Result<MigrationReport> {
    let report = migrate(pool, db_type).await?;
    enable_wal(pool, db_type).await?;
    Ok(report)
}
