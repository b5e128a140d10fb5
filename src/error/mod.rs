mod db;

pub use db::{DbError, Result};

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
