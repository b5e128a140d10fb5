mod common;

use common::TempSqlite;
use playerdb::{AuthEntry, AuthRepository, AuthStore, DatabaseType, DbError, IsRetryable};

fn account(name: &str) -> AuthEntry {
    AuthEntry {
        id: None,
        name: name.to_string(),
        password: "#1#salt#verifier".to_string(),
        last_login: 0,
    }
}

#[tokio::test]
async fn test_busy_writer_is_retryable() {
    let db = TempSqlite::migrated("retry_busy").await;

    // A second pool that gives up on a held write lock at once
    let other = db.reopen("rw", 1).await;
    sqlx::query("PRAGMA busy_timeout = 0")
        .execute(&other)
        .await
        .unwrap();
    let repo = AuthRepository::new(other.clone(), DatabaseType::Sqlite);

    let mut tx = db.pool.begin().await.unwrap();
    sqlx::query("INSERT INTO auth (name, password, last_login) VALUES (?, ?, ?)")
        .bind("holder")
        .bind("")
        .bind(0_i64)
        .execute(&mut *tx)
        .await
        .unwrap();

    let mut entry = account("waiter");
    let err = repo.create(&mut entry).await.unwrap_err();
    assert!(matches!(err, DbError::DatabaseError(_)), "{err}");
    assert!(err.is_retryable(), "{err}");
    assert!(!err.is_unique_violation());
    assert_eq!(entry.id, None);

    tx.rollback().await.unwrap();

    // Once the lock is released the same write goes through
    repo.create(&mut entry).await.unwrap();
    assert!(entry.id.is_some());
    assert_eq!(repo.count().await.unwrap(), 1);

    other.close().await;
    db.cleanup().await;
}

#[tokio::test]
async fn test_constraint_errors_are_not_retryable() {
    let db = TempSqlite::migrated("retry_unique").await;
    let repo = AuthRepository::new(db.pool.clone(), DatabaseType::Sqlite);

    repo.create(&mut account("taken")).await.unwrap();
    let err = repo.create(&mut account("taken")).await.unwrap_err();
    assert!(err.is_unique_violation());
    assert!(!err.is_retryable());

    db.cleanup().await;
}
