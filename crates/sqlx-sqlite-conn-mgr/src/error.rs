//! Error types for sqlx-sqlite-conn-mgr

use std::path::PathBuf;

use thiserror::Error;

/// Errors that may occur when working with sqlx-sqlite-conn-mgr
#[derive(Error, Debug)]
pub enum Error {
   /// IO error when creating directories or removing database files
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   /// A pool could not open its first connection to the database file
   #[error("failed to open {}: {source}", path.display())]
   Connect {
      path: PathBuf,
      #[source]
      source: sqlx::Error,
   },

   /// Error from a statement or connection checkout
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// Database has been closed and cannot be used
   #[error("Database has been closed")]
   DatabaseClosed,
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
