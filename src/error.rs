use serde::{Deserialize, Serialize};
use sqlx::error::ErrorKind;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message that replaces the driver's text for a sanitized foreign key violation.
pub const FOREIGN_KEY_VIOLATION_MESSAGE: &str = "foreign key constraint failed.";

/// Which integrity constraint a write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
   /// `REFERENCES` target row missing.
   ForeignKey,
   /// `UNIQUE` or primary key collision.
   Unique,
   NotNull,
   Check,
}

impl ConstraintKind {
   /// Classify a driver error by its typed kind.
   ///
   /// SQLx derives the kind from SQLite's extended result code
   /// (`SQLITE_CONSTRAINT_FOREIGNKEY`, `SQLITE_CONSTRAINT_UNIQUE`, ...), so the
   /// message text is never inspected.
   pub fn of(err: &sqlx::Error) -> Option<Self> {
      match err.as_database_error()?.kind() {
         ErrorKind::ForeignKeyViolation => Some(Self::ForeignKey),
         ErrorKind::UniqueViolation => Some(Self::Unique),
         ErrorKind::NotNullViolation => Some(Self::NotNull),
         ErrorKind::CheckViolation => Some(Self::Check),
         _ => None,
      }
   }

   fn error_code(self) -> &'static str {
      match self {
         ConstraintKind::ForeignKey => "CONSTRAINT_FOREIGN_KEY",
         ConstraintKind::Unique => "CONSTRAINT_UNIQUE",
         ConstraintKind::NotNull => "CONSTRAINT_NOT_NULL",
         ConstraintKind::Check => "CONSTRAINT_CHECK",
      }
   }
}

/// Error types for library store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations, passed through unmodified.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// Error from the connection manager.
   #[error(transparent)]
   ConnectionManager(#[from] sqlx_sqlite_conn_mgr::Error),

   /// Integrity violation rewritten by [`ViolationPolicy::Sanitize`](crate::ViolationPolicy::Sanitize).
   #[error("{message}")]
   Constraint {
      kind: ConstraintKind,
      message: String,
   },

   /// Transaction failed and rollback also failed.
   #[error("transaction failed: {transaction_error}; rollback also failed: {rollback_error}")]
   TransactionRollbackFailed {
      transaction_error: Box<Error>,
      rollback_error: sqlx::Error,
   },
}

impl Error {
   /// The violated constraint, for both raw driver errors and sanitized ones.
   pub fn constraint_kind(&self) -> Option<ConstraintKind> {
      match self {
         Error::Sqlx(e) => ConstraintKind::of(e),
         Error::ConnectionManager(sqlx_sqlite_conn_mgr::Error::Sqlx(e)) => ConstraintKind::of(e),
         Error::Constraint { kind, .. } => Some(*kind),
         Error::TransactionRollbackFailed {
            transaction_error, ..
         } => transaction_error.constraint_kind(),
         _ => None,
      }
   }

   /// Replace driver text on integrity violations.
   ///
   /// Foreign key violations get [`FOREIGN_KEY_VIOLATION_MESSAGE`]; other
   /// violations keep the driver's message but become [`Error::Constraint`].
   /// The failure inside a [`Error::TransactionRollbackFailed`] is rewritten
   /// the same way. Everything else is returned as is.
   pub fn sanitized(self) -> Self {
      match self {
         Error::Sqlx(e) => match ConstraintKind::of(&e) {
            Some(ConstraintKind::ForeignKey) => Error::Constraint {
               kind: ConstraintKind::ForeignKey,
               message: FOREIGN_KEY_VIOLATION_MESSAGE.to_string(),
            },
            Some(kind) => Error::Constraint {
               kind,
               message: e.to_string(),
            },
            None => Error::Sqlx(e),
         },
         Error::TransactionRollbackFailed {
            transaction_error,
            rollback_error,
         } => Error::TransactionRollbackFailed {
            transaction_error: Box::new((*transaction_error).sanitized()),
            rollback_error,
         },
         other => other,
      }
   }

   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::ConnectionManager(sqlx_sqlite_conn_mgr::Error::DatabaseClosed) => {
            "DATABASE_CLOSED".to_string()
         }
         Error::ConnectionManager(_) => "CONNECTION_ERROR".to_string(),
         Error::Constraint { kind, .. } => kind.error_code().to_string(),
         Error::TransactionRollbackFailed { .. } => "TRANSACTION_ROLLBACK_FAILED".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_constraint_displays_its_message() {
      let err = Error::Constraint {
         kind: ConstraintKind::ForeignKey,
         message: FOREIGN_KEY_VIOLATION_MESSAGE.into(),
      };
      assert_eq!(err.to_string(), "foreign key constraint failed.");
      assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
      assert_eq!(err.error_code(), "CONSTRAINT_FOREIGN_KEY");
   }

   #[test]
   fn test_error_code_sqlx_non_database() {
      // RowNotFound is not a database error, so no SQLite code
      let err = Error::Sqlx(sqlx::Error::RowNotFound);
      assert_eq!(err.error_code(), "SQLX_ERROR");
      assert_eq!(err.constraint_kind(), None);
   }

   #[test]
   fn test_error_code_database_closed() {
      let err = Error::ConnectionManager(sqlx_sqlite_conn_mgr::Error::DatabaseClosed);
      assert_eq!(err.error_code(), "DATABASE_CLOSED");
   }

   #[test]
   fn test_error_code_transaction_rollback_failed() {
      let err = Error::TransactionRollbackFailed {
         transaction_error: Box::new(Error::Constraint {
            kind: ConstraintKind::Unique,
            message: "UNIQUE constraint failed: books.title".into(),
         }),
         rollback_error: sqlx::Error::PoolTimedOut,
      };
      assert_eq!(err.error_code(), "TRANSACTION_ROLLBACK_FAILED");
      assert_eq!(err.constraint_kind(), Some(ConstraintKind::Unique));
      assert!(err.to_string().contains("UNIQUE constraint failed"));
      assert!(err.to_string().contains("pool timed out"));
   }

   #[test]
   fn test_sanitized_passes_non_constraint_errors_through() {
      let err = Error::Sqlx(sqlx::Error::RowNotFound).sanitized();
      assert!(matches!(err, Error::Sqlx(sqlx::Error::RowNotFound)));

      let err = Error::ConnectionManager(sqlx_sqlite_conn_mgr::Error::DatabaseClosed).sanitized();
      assert!(matches!(
         err,
         Error::ConnectionManager(sqlx_sqlite_conn_mgr::Error::DatabaseClosed)
      ));
   }

   #[test]
   fn test_constraint_kind_serializes_snake_case() {
      let json = serde_json::to_string(&ConstraintKind::ForeignKey).unwrap();
      assert_eq!(json, "\"foreign_key\"");
   }
}
