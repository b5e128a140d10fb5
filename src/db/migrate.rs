//! Versioned schema migrations.
//!
//! Each [`MigrationSet`] owns an ordered list of steps and one row in the
//! `schema_version` table recording the last applied step. A run reads the
//! marker, applies the newer steps in ascending order, and advances the
//! marker after each step. Everything happens in one transaction: a failed
//! step rolls the whole run back, so the database is either untouched or
//! fully migrated.

use chrono::Utc;
use sqlx::{AnyConnection, AnyPool};
use tracing::{debug, info, warn};

use crate::db::dialect::DatabaseType;
use crate::db::schema;
use crate::error::{DbError, Result};

/// A single DDL step. Steps must be idempotent on their own
/// (`CREATE ... IF NOT EXISTS`) so hand-provisioned databases migrate too.
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    ddl: fn(DatabaseType) -> String,
}

impl Migration {
    pub fn sql(&self, db_type: DatabaseType) -> String {
        (self.ddl)(db_type)
    }
}

/// Steps sharing one version marker.
pub struct MigrationSet {
    pub name: &'static str,
    pub steps: &'static [Migration],
}

impl MigrationSet {
    pub fn latest(&self) -> i64 {
        self.steps.last().map_or(0, |m| m.version)
    }
}

pub const AUTH: MigrationSet = MigrationSet {
    name: "auth",
    steps: &[
        Migration {
            version: 1,
            description: "create auth table",
            ddl: schema::auth,
        },
        Migration {
            version: 2,
            description: "create user_privileges table",
            ddl: schema::user_privileges,
        },
    ],
};

pub const MOD_STORAGE: MigrationSet = MigrationSet {
    name: "mod_storage",
    steps: &[Migration {
        version: 1,
        description: "create entries table",
        ddl: schema::entries,
    }],
};

/// Every set, in the order they are applied by [`migrate`].
pub const ALL: &[MigrationSet] = &[AUTH, MOD_STORAGE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedStep {
    pub set: &'static str,
    pub version: i64,
}

/// Steps applied by one run. Empty when the schema was already current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<AppliedStep>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Brings every table to the latest schema.
pub async fn migrate(pool: &AnyPool, db_type: DatabaseType) -> Result<MigrationReport> {
    run(pool, db_type, ALL).await
}

/// Migrates only the `auth` and `user_privileges` tables.
pub async fn migrate_auth(pool: &AnyPool, db_type: DatabaseType) -> Result<MigrationReport> {
    run(pool, db_type, &[AUTH]).await
}

/// Migrates only the mod storage `entries` table.
pub async fn migrate_mod_storage(
    pool: &AnyPool,
    db_type: DatabaseType,
) -> Result<MigrationReport> {
    run(pool, db_type, &[MOD_STORAGE]).await
}

async fn run(
    pool: &AnyPool,
    db_type: DatabaseType,
    sets: &[MigrationSet],
) -> Result<MigrationReport> {
    let mut tx = pool.begin().await?;
    // Current databases must see no DDL at all.
    let marker_tables: i64 = sqlx::query_scalar(schema::schema_version_exists(db_type))
        .fetch_one(&mut *tx)
        .await?;
    if marker_tables == 0 {
        sqlx::query(&schema::schema_version(db_type))
            .execute(&mut *tx)
            .await?;
    }

    let mut report = MigrationReport::default();
    for set in sets {
        let current = read_version(&mut tx, db_type, set.name).await?;
        if current > set.latest() {
            warn!(
                set = set.name,
                current,
                latest = set.latest(),
                "schema marker is newer than any known migration, leaving it as is"
            );
            continue;
        }

        for step in set.steps.iter().filter(|m| m.version > current) {
            info!(
                backend = %db_type,
                set = set.name,
                version = step.version,
                description = step.description,
                "applying migration"
            );
            sqlx::query(&step.sql(db_type))
                .execute(&mut *tx)
                .await
                .map_err(|source| DbError::Migration {
                    set: set.name,
                    version: step.version,
                    source,
                })?;
            write_version(&mut tx, db_type, set.name, step.version).await?;
            report.applied.push(AppliedStep {
                set: set.name,
                version: step.version,
            });
        }
    }

    tx.commit().await?;

    if report.is_noop() {
        debug!(backend = %db_type, "schema already current");
    }
    Ok(report)
}

async fn read_version(conn: &mut AnyConnection, db_type: DatabaseType, set: &str) -> Result<i64> {
    let sql = format!(
        "SELECT version FROM schema_version WHERE name = {}",
        db_type.placeholder(1)
    );
    let version: Option<i64> = sqlx::query_scalar(&sql)
        .bind(set)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(version.unwrap_or(0))
}

async fn write_version(
    conn: &mut AnyConnection,
    db_type: DatabaseType,
    set: &str,
    version: i64,
) -> Result<()> {
    let sql = format!(
        "INSERT INTO schema_version (name, version, applied_at) VALUES ({}, {}, {}) \
         ON CONFLICT (name) DO UPDATE SET version = excluded.version, applied_at = excluded.applied_at",
        db_type.placeholder(1),
        db_type.placeholder(2),
        db_type.placeholder(3),
    );
    sqlx::query(&sql)
        .bind(set)
        .bind(version)
        .bind(Utc::now().timestamp())
        .execute(&mut *conn)
        .await?;
    Ok(())
}
