//! # library-store
//!
//! A two-table library (authors, books) in an embedded SQLite file.
//!
//! - [`LibraryStore`] owns the database handle and exposes
//!   [`reset_schema`](LibraryStore::reset_schema) and
//!   [`insert_book`](LibraryStore::insert_book).
//! - Foreign key enforcement is chosen per store through [`StoreConfig`]; it
//!   is applied to every connection the store opens.
//! - Integrity violations surface as typed errors ([`Error::constraint_kind`]),
//!   optionally rewritten by [`ViolationPolicy::Sanitize`].
//! - [`Profile`] names the three configurations the binaries run with.
//!
//! ```no_run
//! use library_store::{ConstraintKind, LibraryStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> library_store::Result<()> {
//!    let store = LibraryStore::open(StoreConfig::default()).await?;
//!    store.reset_schema().await?;
//!
//!    let err = store.insert_book("Book 1", 1).await.unwrap_err();
//!    assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
//!
//!    store.close().await
//! }
//! ```

mod config;
mod error;
mod models;
mod profile;
pub mod schema;
mod store;

pub use config::{DEFAULT_DATABASE_PATH, StoreConfig, ViolationPolicy};
pub use error::{ConstraintKind, Error, FOREIGN_KEY_VIOLATION_MESSAGE, Result};
pub use models::{Author, Book};
pub use profile::{DEMO_AUTHOR_ID, DEMO_BOOK_TITLE, Profile, init_tracing, run};
pub use store::LibraryStore;
