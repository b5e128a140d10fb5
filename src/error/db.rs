use sqlx::error::DatabaseError;
use thiserror::Error as ThisError;

use super::IsRetryable;

/// Convenience alias for results with [`DbError`].
pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, ThisError)]
pub enum DbError {
    #[error("unsupported database backend: {0}")]
    UnsupportedBackend(String),

    #[error("unique constraint violated on table `{table}`: {source}")]
    UniqueViolation {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration `{set}` step {version} failed: {source}")]
    Migration {
        set: &'static str,
        version: i64,
        #[source]
        source: sqlx::Error,
    },

    #[error("journal mode is `{actual}`, expected `wal`")]
    JournalMode { actual: String },

    /// The entry has no surrogate key; it was never created.
    #[error("entry has no assigned id")]
    MissingId,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl DbError {
    /// Wraps a write error, lifting constraint rejections on `table` into
    /// [`DbError::UniqueViolation`].
    pub(crate) fn on_write(table: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |err| {
            if matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation()) {
                DbError::UniqueViolation { table, source: err }
            } else {
                DbError::DatabaseError(err)
            }
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }

    fn backend(&self) -> Option<&sqlx::Error> {
        match self {
            DbError::UniqueViolation { source, .. } | DbError::Migration { source, .. } => {
                Some(source)
            }
            DbError::DatabaseError(e) => Some(e),
            _ => None,
        }
    }
}

impl IsRetryable for DbError {
    fn is_retryable(&self) -> bool {
        match self.backend() {
            Some(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => true,
            Some(sqlx::Error::Database(db)) => is_contention(&**db),
            _ => false,
        }
    }
}

fn is_contention(db: &dyn DatabaseError) -> bool {
    db.code().is_some_and(|code| is_contention_code(&code))
}

/// SQLite busy/locked (primary codes 5 and 6, extended codes keep the low
/// byte) and Postgres serialization failure / deadlock.
fn is_contention_code(code: &str) -> bool {
    match code {
        "40001" | "40P01" => true,
        other => other
            .parse::<i32>()
            .is_ok_and(|c| matches!(c & 0xff, 5 | 6)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_backend_message_names_the_tag() {
        let err = DbError::UnsupportedBackend("mysql".to_string());
        assert_eq!(err.to_string(), "unsupported database backend: mysql");
        assert!(!err.is_retryable());
    }

    #[test]
    fn pool_timeout_is_retryable() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_retryable());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn contention_codes() {
        // SQLITE_BUSY, SQLITE_LOCKED and their extended forms
        assert!(is_contention_code("5"));
        assert!(is_contention_code("6"));
        assert!(is_contention_code("517"));
        assert!(is_contention_code("262"));
        // serialization_failure, deadlock_detected
        assert!(is_contention_code("40001"));
        assert!(is_contention_code("40P01"));

        // SQLITE_CONSTRAINT_UNIQUE, unique_violation, syntax_error
        assert!(!is_contention_code("2067"));
        assert!(!is_contention_code("23505"));
        assert!(!is_contention_code("42601"));
        assert!(!is_contention_code("1"));
        assert!(!is_contention_code(""));
    }

    #[test]
    fn non_database_errors_pass_through_write_mapping() {
        let err = DbError::on_write("auth")(sqlx::Error::RowNotFound);
        assert!(matches!(
            err,
            DbError::DatabaseError(sqlx::Error::RowNotFound)
        ));
    }
}
