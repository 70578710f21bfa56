//! Store configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sqlx_sqlite_conn_mgr::SqliteDatabaseConfig;

use crate::Error;

/// Database file used by the binaries.
pub const DEFAULT_DATABASE_PATH: &str = "library.db";

/// What the store does with an integrity violation before returning it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
   /// Return the driver error unmodified.
   #[default]
   Propagate,

   /// Rewrite violations into [`Error::Constraint`], hiding the driver's
   /// foreign key message.
   Sanitize,
}

impl ViolationPolicy {
   /// Pass `err` through this policy.
   pub fn apply(self, err: Error) -> Error {
      match self {
         ViolationPolicy::Propagate => err,
         ViolationPolicy::Sanitize => err.sanitized(),
      }
   }
}

/// Configuration for a [`LibraryStore`](crate::LibraryStore)
///
/// # Examples
///
/// ```
/// use library_store::{StoreConfig, ViolationPolicy};
///
/// let config = StoreConfig {
///     database_path: "/tmp/library.db".into(),
///     violation_policy: ViolationPolicy::Sanitize,
///     ..Default::default()
/// };
/// assert!(config.enforce_foreign_keys);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
   /// Database file, created if missing
   ///
   /// Default: `library.db`
   pub database_path: PathBuf,

   /// Check `books.author_id` against `authors.id`
   ///
   /// Default: true
   pub enforce_foreign_keys: bool,

   /// Default: [`ViolationPolicy::Propagate`]
   pub violation_policy: ViolationPolicy,

   /// Echo every SQL statement on the `sqlx::query` target
   ///
   /// Default: false
   pub log_statements: bool,
}

impl Default for StoreConfig {
   fn default() -> Self {
      Self {
         database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
         enforce_foreign_keys: true,
         violation_policy: ViolationPolicy::default(),
         log_statements: false,
      }
   }
}

impl StoreConfig {
   /// Connection manager settings derived from this config.
   pub fn database_config(&self) -> SqliteDatabaseConfig {
      SqliteDatabaseConfig {
         foreign_keys: self.enforce_foreign_keys,
         log_statements: self.log_statements,
         ..Default::default()
      }
   }
}
