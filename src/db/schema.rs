//! SQL DDL for the persisted tables, rendered per dialect.
//!
//! Table layouts match what the game server itself creates, so databases
//! provisioned by the server migrate cleanly.

use crate::db::dialect::DatabaseType;

/// Version marker storage, one row per migration set.
pub fn schema_version(_db_type: DatabaseType) -> String {
    r#"
CREATE TABLE IF NOT EXISTS schema_version (
    name TEXT PRIMARY KEY NOT NULL,
    version BIGINT NOT NULL,
    applied_at BIGINT NOT NULL
)"#
    .to_string()
}

/// Counts `schema_version` tables visible to the connection (0 or 1).
pub fn schema_version_exists(db_type: DatabaseType) -> &'static str {
    match db_type {
        DatabaseType::Sqlite => {
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'"
        }
        DatabaseType::Postgres => {
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = 'schema_version'"
        }
    }
}

/// Accounts: surrogate id, unique case-sensitive name, opaque password.
pub fn auth(db_type: DatabaseType) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS auth (
    id {pk},
    name TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    last_login BIGINT NOT NULL
)"#,
        pk = db_type.autoincrement_pk()
    )
}

/// Privilege memberships; the (id, privilege) pair is the key.
pub fn user_privileges(_db_type: DatabaseType) -> String {
    r#"
CREATE TABLE IF NOT EXISTS user_privileges (
    id BIGINT NOT NULL,
    privilege TEXT NOT NULL,
    PRIMARY KEY (id, privilege),
    CONSTRAINT fk_id FOREIGN KEY (id) REFERENCES auth (id) ON DELETE CASCADE
)"#
    .to_string()
}

/// Mod storage key/value pairs.
pub fn entries(db_type: DatabaseType) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS entries (
    modname TEXT NOT NULL,
    key {blob} NOT NULL,
    value {blob} NOT NULL,
    PRIMARY KEY (modname, key)
)"#,
        blob = db_type.blob_type()
    )
}
