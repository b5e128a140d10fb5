mod common;

use common::TempSqlite;
use playerdb::{DatabaseType, DbError, db};
use sqlx::any::AnyPoolOptions;

async fn journal_mode(pool: &sqlx::AnyPool) -> String {
    sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Journal mode as seen by a connection opened after the switch.
async fn persisted_journal_mode(db: &TempSqlite) -> String {
    let pool = db.reopen("rw", 1).await;
    let mode = journal_mode(&pool).await.to_lowercase();
    pool.close().await;
    mode
}

#[tokio::test]
async fn test_enable_wal_is_idempotent() {
    let db = TempSqlite::new("wal_twice").await;
    db::migrate(&db.pool, DatabaseType::Sqlite).await.unwrap();
    assert_ne!(persisted_journal_mode(&db).await, "wal");

    db::enable_wal(&db.pool, DatabaseType::Sqlite).await.unwrap();
    assert_eq!(persisted_journal_mode(&db).await, "wal");

    db::enable_wal(&db.pool, DatabaseType::Sqlite).await.unwrap();
    assert_eq!(persisted_journal_mode(&db).await, "wal");

    db.cleanup().await;
}

#[tokio::test]
async fn test_setup_twice_on_same_file() {
    let db = TempSqlite::new("wal_setup").await;

    let first = db::setup(&db.pool, DatabaseType::Sqlite).await.unwrap();
    let second = db::setup(&db.pool, DatabaseType::Sqlite).await.unwrap();
    assert!(!first.is_noop());
    assert!(second.is_noop());

    db.cleanup().await;
}

#[tokio::test]
async fn test_enable_wal_reports_refusal() {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    // In-memory databases cannot use a write-ahead log
    let err = db::enable_wal(&pool, DatabaseType::Sqlite)
        .await
        .unwrap_err();
    assert!(
        matches!(err, DbError::JournalMode { ref actual } if actual == "memory"),
        "{err}"
    );
}

#[tokio::test]
async fn test_enable_wal_is_noop_for_postgres() {
    let db = TempSqlite::new("wal_postgres_tag").await;

    db::enable_wal(&db.pool, DatabaseType::Postgres).await.unwrap();
    assert_ne!(persisted_journal_mode(&db).await, "wal");

    db.cleanup().await;
}
