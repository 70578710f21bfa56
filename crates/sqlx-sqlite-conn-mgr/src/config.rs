//! Configuration for SQLite database connection pools

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for SqliteDatabase connection pools
///
/// # Examples
///
/// ```
/// use sqlx_sqlite_conn_mgr::SqliteDatabaseConfig;
/// use std::time::Duration;
///
/// // Use defaults
/// let config = SqliteDatabaseConfig::default();
/// assert!(config.foreign_keys);
///
/// // Leave reference checks to the caller and echo every statement
/// let config = SqliteDatabaseConfig {
///     foreign_keys: false,
///     log_statements: true,
///     ..Default::default()
/// };
/// assert_eq!(config.idle_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteDatabaseConfig {
   /// Maximum number of concurrent read connections
   ///
   /// Default: 6
   pub max_read_connections: u32,

   /// Idle timeout for both read and write connections
   ///
   /// Connections that remain idle for this duration will be closed automatically.
   ///
   /// Default: 30 seconds
   pub idle_timeout: Duration,

   /// Whether SQLite checks `REFERENCES` constraints on this database's connections
   ///
   /// SQLite itself ignores foreign keys unless the pragma is switched on per
   /// connection. SQLx switches it on by default, so `false` here explicitly
   /// switches it back off.
   ///
   /// Default: true
   pub foreign_keys: bool,

   /// Emit every executed statement on the `sqlx::query` tracing target at INFO
   ///
   /// Default: false
   pub log_statements: bool,
}

impl Default for SqliteDatabaseConfig {
   fn default() -> Self {
      Self {
         max_read_connections: 6,
         idle_timeout: Duration::from_secs(30),
         foreign_keys: true,
         log_statements: false,
      }
   }
}
