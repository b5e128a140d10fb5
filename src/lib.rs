//! Persistence for a multiplayer game server: accounts, privileges and mod
//! storage, on either SQLite or PostgreSQL.
//!
//! Typical flow: open a pool with [`db::connect`], run [`db::setup`] once
//! (migrations, then WAL for SQLite), then build repositories against the
//! same pool.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod mod_storage;

pub use auth::{
    AuthEntry, AuthRepository, AuthStore, PrivilegeEntry, PrivilegeRepository, PrivilegeStore,
};
pub use db::DatabaseType;
pub use error::{DbError, IsRetryable, Result};
pub use mod_storage::{ModStorageEntry, ModStorageRepository, ModStore};
