//! # sqlx-sqlite-conn-mgr
//!
//! A small wrapper around SQLx that applies a fixed connection policy to an
//! embedded SQLite database file.
//!
//! ## Core Types
//!
//! - **[`SqliteDatabase`]**: Database handle with separate read and write connection pools
//! - **[`SqliteDatabaseConfig`]**: Pool sizing, foreign key enforcement and statement logging
//! - **[`WriteGuard`]**: RAII guard ensuring exclusive write access
//! - **[`Error`]**: Error type for database operations
//!
//! ## Architecture
//!
//! - **Dual pools**: Read-only pool (max 6 connections by default) and write pool (max 1 connection)
//! - **Foreign keys**: `PRAGMA foreign_keys` is set on every connection from the config, so
//!   enforcement is a property of the handle rather than of individual statements
//! - **Lazy WAL mode**: Write-Ahead Logging enabled on the first writer acquisition
//! - **Exclusive writes**: Single-connection write pool serializes writers

mod config;
mod database;
mod error;
mod write_guard;

pub use config::SqliteDatabaseConfig;
pub use database::SqliteDatabase;
pub use error::{Error, Result};
pub use write_guard::WriteGuard;
