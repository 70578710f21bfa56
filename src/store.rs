//! The library store: schema reset, inserts and lookups

use std::sync::Arc;

use sqlx::sqlite::SqliteConnection;
use sqlx_sqlite_conn_mgr::SqliteDatabase;
use tracing::{debug, info};

use crate::config::{StoreConfig, ViolationPolicy};
use crate::models::{Author, Book};
use crate::schema;
use crate::{Error, Result};

/// Handle over the library database.
///
/// Created once with [`LibraryStore::open`] and passed to whatever needs it.
/// Each write acquires the single writer connection for the duration of one
/// transaction and releases it on return, whether the transaction committed or
/// not.
#[derive(Debug)]
pub struct LibraryStore {
   db: Arc<SqliteDatabase>,
   policy: ViolationPolicy,
}

impl LibraryStore {
   /// Open (or create) the database described by `config`.
   pub async fn open(config: StoreConfig) -> Result<Self> {
      let db =
         SqliteDatabase::connect(&config.database_path, Some(config.database_config())).await?;

      info!(
         "Opened library store at {} (foreign_keys={}, policy={:?})",
         config.database_path.display(),
         config.enforce_foreign_keys,
         config.violation_policy
      );

      Ok(Self {
         db,
         policy: config.violation_policy,
      })
   }

   /// Whether `books.author_id` is checked against `authors.id`.
   pub fn foreign_keys_enabled(&self) -> bool {
      self.db.foreign_keys_enabled()
   }

   /// What this store does with integrity violations before returning them.
   pub fn violation_policy(&self) -> ViolationPolicy {
      self.policy
   }

   /// Drop and recreate both tables. All existing rows are lost.
   pub async fn reset_schema(&self) -> Result<()> {
      let mut writer = self.db.acquire_writer().await?;

      sqlx::query("BEGIN IMMEDIATE").execute(&mut *writer).await?;

      let result = async {
         for &statement in schema::RESET_STATEMENTS {
            sqlx::query(statement).execute(&mut *writer).await?;
         }
         Ok::<(), Error>(())
      }
      .await;

      finish_transaction(&mut writer, result).await?;
      debug!("Schema reset for {}", self.db.path().display());
      Ok(())
   }

   /// Insert an author and return it with its assigned id.
   pub async fn insert_author(&self, name: &str) -> Result<Author> {
      let mut writer = self.db.acquire_writer().await?;

      sqlx::query("BEGIN IMMEDIATE").execute(&mut *writer).await?;

      let result = async {
         let done = sqlx::query("INSERT INTO authors (name) VALUES (?)")
            .bind(name)
            .execute(&mut *writer)
            .await?;

         Ok::<Author, Error>(Author {
            id: done.last_insert_rowid(),
            name: name.to_string(),
         })
      }
      .await;

      let author = finish_transaction(&mut writer, result)
         .await
         .map_err(|e| self.policy.apply(e))?;

      debug!("Inserted author {} ({})", author.id, author.name);
      Ok(author)
   }

   /// Insert a book and return it with its assigned id.
   ///
   /// With foreign keys enforced, an `author_id` with no matching author fails
   /// with a [`ConstraintKind::ForeignKey`](crate::ConstraintKind::ForeignKey)
   /// violation; a repeated title fails with
   /// [`ConstraintKind::Unique`](crate::ConstraintKind::Unique). The error is
   /// passed through the store's [`ViolationPolicy`] and nothing is persisted.
   pub async fn insert_book(&self, title: &str, author_id: i64) -> Result<Book> {
      let mut writer = self.db.acquire_writer().await?;

      sqlx::query("BEGIN IMMEDIATE").execute(&mut *writer).await?;

      let result = async {
         let done = sqlx::query("INSERT INTO books (title, author_id) VALUES (?, ?)")
            .bind(title)
            .bind(author_id)
            .execute(&mut *writer)
            .await?;

         Ok::<Book, Error>(Book {
            id: done.last_insert_rowid(),
            title: title.to_string(),
            author_id,
         })
      }
      .await;

      match finish_transaction(&mut writer, result).await {
         Ok(book) => {
            debug!(
               "Inserted book {} ({}) for author {}",
               book.id, book.title, book.author_id
            );
            Ok(book)
         }
         Err(e) => {
            debug!("Insert of book {:?} failed: {}", title, e);
            Err(self.policy.apply(e))
         }
      }
   }

   /// All authors, ordered by id.
   pub async fn list_authors(&self) -> Result<Vec<Author>> {
      let authors = sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY id")
         .fetch_all(self.db.read_pool()?)
         .await?;
      Ok(authors)
   }

   /// All books, ordered by id.
   pub async fn list_books(&self) -> Result<Vec<Book>> {
      let books = sqlx::query_as::<_, Book>("SELECT id, title, author_id FROM books ORDER BY id")
         .fetch_all(self.db.read_pool()?)
         .await?;
      Ok(books)
   }

   /// The book with exactly this title, if any.
   pub async fn find_book_by_title(&self, title: &str) -> Result<Option<Book>> {
      let book =
         sqlx::query_as::<_, Book>("SELECT id, title, author_id FROM books WHERE title = ?")
            .bind(title)
            .fetch_optional(self.db.read_pool()?)
            .await?;
      Ok(book)
   }

   /// User tables currently in the database, sorted by name.
   pub async fn table_names(&self) -> Result<Vec<String>> {
      let names = sqlx::query_scalar::<_, String>(
         "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
      )
      .fetch_all(self.db.read_pool()?)
      .await?;
      Ok(names)
   }

   /// Close the underlying connection pools.
   pub async fn close(&self) -> Result<()> {
      self.db.close().await?;
      Ok(())
   }

   /// Close the store and delete its database files.
   pub async fn remove(self) -> Result<()> {
      self.db.remove().await?;
      Ok(())
   }
}

/// Commit on success, roll back on error.
///
/// A failed `COMMIT` (e.g. a deferred constraint) leaves SQLite's transaction
/// open, so it is rolled back too before the connection goes back to the pool.
/// If the rollback itself fails both errors are reported together.
async fn finish_transaction<T>(conn: &mut SqliteConnection, result: Result<T>) -> Result<T> {
   match result {
      Ok(value) => match sqlx::query("COMMIT").execute(&mut *conn).await {
         Ok(_) => Ok(value),
         Err(commit_err) => rollback(conn, Error::Sqlx(commit_err)).await,
      },
      Err(e) => rollback(conn, e).await,
   }
}

async fn rollback<T>(conn: &mut SqliteConnection, cause: Error) -> Result<T> {
   match sqlx::query("ROLLBACK").execute(&mut *conn).await {
      Ok(_) => {
         debug!("Transaction rolled back: {}", cause);
         Err(cause)
      }
      Err(rollback_error) => Err(Error::TransactionRollbackFailed {
         transaction_error: Box::new(cause),
         rollback_error,
      }),
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::error::{ConstraintKind, FOREIGN_KEY_VIOLATION_MESSAGE};
   use tempfile::TempDir;

   async fn create_test_store() -> (LibraryStore, TempDir) {
      let temp_dir = TempDir::new().expect("Failed to create temp directory");
      let config = StoreConfig {
         database_path: temp_dir.path().join("library.db"),
         ..Default::default()
      };
      let store = LibraryStore::open(config)
         .await
         .expect("Failed to open test store");

      (store, temp_dir)
   }

   #[tokio::test]
   async fn test_finish_transaction_commits() {
      let (store, _temp) = create_test_store().await;
      store.reset_schema().await.unwrap();

      let mut writer = store.db.acquire_writer().await.unwrap();
      sqlx::query("BEGIN IMMEDIATE")
         .execute(&mut *writer)
         .await
         .unwrap();
      sqlx::query("INSERT INTO authors (name) VALUES ('Ada')")
         .execute(&mut *writer)
         .await
         .unwrap();
      finish_transaction(&mut writer, Ok(())).await.unwrap();
      drop(writer);

      assert_eq!(store.list_authors().await.unwrap().len(), 1);
      store.remove().await.unwrap();
   }

   #[tokio::test]
   async fn test_finish_transaction_rolls_back_on_error() {
      let (store, _temp) = create_test_store().await;
      store.reset_schema().await.unwrap();

      let mut writer = store.db.acquire_writer().await.unwrap();
      sqlx::query("BEGIN IMMEDIATE")
         .execute(&mut *writer)
         .await
         .unwrap();
      sqlx::query("INSERT INTO authors (name) VALUES ('Ada')")
         .execute(&mut *writer)
         .await
         .unwrap();
      let err = finish_transaction::<()>(&mut writer, Err(Error::Sqlx(sqlx::Error::RowNotFound)))
         .await
         .unwrap_err();
      drop(writer);

      assert!(matches!(err, Error::Sqlx(sqlx::Error::RowNotFound)));

      // the writer is free of the failed transaction: a new one can begin and commit
      let author = store.insert_author("Ada").await.unwrap();
      assert_eq!(author.id, 1);
      assert_eq!(store.list_authors().await.unwrap(), vec![author]);

      store.remove().await.unwrap();
   }

   #[tokio::test]
   async fn test_failed_insert_releases_writer() {
      let (store, _temp) = create_test_store().await;
      store.reset_schema().await.unwrap();

      store.insert_book("Book 1", 1).await.unwrap_err();

      let author = store.insert_author("Author 1").await.unwrap();
      store.insert_book("Book 1", author.id).await.unwrap();
      assert_eq!(store.list_books().await.unwrap().len(), 1);

      store.remove().await.unwrap();
   }

   #[tokio::test]
   async fn test_failed_commit_is_rolled_back() {
      let (store, _temp) = create_test_store().await;

      let mut writer = store.db.acquire_writer().await.unwrap();
      for statement in [
         "CREATE TABLE parents (id INTEGER PRIMARY KEY)",
         "CREATE TABLE children (id INTEGER PRIMARY KEY, parent_id INTEGER REFERENCES parents (id) DEFERRABLE INITIALLY DEFERRED)",
         "BEGIN IMMEDIATE",
         "INSERT INTO children (parent_id) VALUES (42)",
      ] {
         sqlx::query(statement).execute(&mut *writer).await.unwrap();
      }

      // deferred foreign key is only checked at COMMIT
      let err = finish_transaction(&mut writer, Ok(())).await.unwrap_err();
      assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));

      // transaction is closed, so a new one can start on the same connection
      sqlx::query("BEGIN IMMEDIATE")
         .execute(&mut *writer)
         .await
         .unwrap();
      sqlx::query("ROLLBACK")
         .execute(&mut *writer)
         .await
         .unwrap();
      drop(writer);

      let children: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM children")
         .fetch_one(store.db.read_pool().unwrap())
         .await
         .unwrap();
      assert_eq!(children, 0);

      store.remove().await.unwrap();
   }

   #[tokio::test]
   async fn test_rollback_without_transaction_reports_both_errors() {
      let (store, _temp) = create_test_store().await;

      // no BEGIN, so ROLLBACK fails with "no transaction is active"
      let mut writer = store.db.acquire_writer().await.unwrap();
      let err = finish_transaction::<()>(&mut writer, Err(Error::Sqlx(sqlx::Error::RowNotFound)))
         .await
         .unwrap_err();
      drop(writer);

      assert_eq!(err.error_code(), "TRANSACTION_ROLLBACK_FAILED");
      store.remove().await.unwrap();
   }

   #[tokio::test]
   async fn test_sanitize_hides_foreign_key_text_behind_rollback_failure() {
      let (store, _temp) = create_test_store().await;
      store.reset_schema().await.unwrap();

      let raw = store.insert_book("Book 1", 1).await.unwrap_err();
      assert!(raw.to_string().contains("FOREIGN KEY constraint failed"));

      let err = ViolationPolicy::Sanitize.apply(Error::TransactionRollbackFailed {
         transaction_error: Box::new(raw),
         rollback_error: sqlx::Error::PoolTimedOut,
      });

      assert!(!err.to_string().contains("FOREIGN KEY"));
      assert!(err.to_string().contains(FOREIGN_KEY_VIOLATION_MESSAGE));
      assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
      assert_eq!(err.error_code(), "TRANSACTION_ROLLBACK_FAILED");

      store.remove().await.unwrap();
   }
}
