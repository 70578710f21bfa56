//! The three process variants and the flow they share

use std::path::PathBuf;

use tracing::Level;

use crate::config::{StoreConfig, ViolationPolicy};
use crate::models::Book;
use crate::Result;
use crate::store::LibraryStore;

/// Title inserted by [`run`].
pub const DEMO_BOOK_TITLE: &str = "Book 1";

/// Author id referenced by [`run`]. No author row is ever created for it.
pub const DEMO_AUTHOR_ID: i64 = 1;

/// Store settings for each entry point.
///
/// | Profile      | foreign keys | violations | statement log |
/// |--------------|--------------|------------|---------------|
/// | `Unhandled`  | on           | propagate  | off           |
/// | `Sanitized`  | on           | sanitize   | off           |
/// | `Unenforced` | off          | propagate  | on            |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
   /// Violations surface as raw driver errors.
   Unhandled,
   /// Violations are rewritten, foreign key text hidden.
   Sanitized,
   /// No reference checks, every statement logged.
   Unenforced,
}

impl Profile {
   /// The store settings for this profile, on the given database file.
   pub fn config(self, database_path: impl Into<PathBuf>) -> StoreConfig {
      let base = StoreConfig {
         database_path: database_path.into(),
         ..Default::default()
      };

      match self {
         Profile::Unhandled => base,
         Profile::Sanitized => StoreConfig {
            violation_policy: ViolationPolicy::Sanitize,
            ..base
         },
         Profile::Unenforced => StoreConfig {
            enforce_foreign_keys: false,
            log_statements: true,
            ..base
         },
      }
   }
}

/// Reset the schema, then insert [`DEMO_BOOK_TITLE`] for [`DEMO_AUTHOR_ID`].
///
/// The store is closed before returning on both the success and the error path.
pub async fn run(config: StoreConfig) -> Result<Book> {
   let store = LibraryStore::open(config).await?;

   let result = async {
      store.reset_schema().await?;
      store.insert_book(DEMO_BOOK_TITLE, DEMO_AUTHOR_ID).await
   }
   .await;

   let closed = store.close().await;
   let book = result?;
   closed?;
   Ok(book)
}

/// Install the fmt subscriber used by the binaries.
///
/// Diagnostics go to stderr, keeping stdout for the process's own output.
/// Statement logging is emitted at INFO, so the level is raised when it is on.
pub fn init_tracing(config: &StoreConfig) {
   let level = if config.log_statements {
      Level::INFO
   } else {
      Level::WARN
   };

   // Already installed (e.g. by a test harness) is fine
   let _ = tracing_subscriber::fmt()
      .with_max_level(level)
      .with_target(true)
      .with_writer(std::io::stderr)
      .try_init();
}
