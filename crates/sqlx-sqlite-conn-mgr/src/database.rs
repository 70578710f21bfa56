//! SQLite database with connection pooling and exclusive write access

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::LevelFilter;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Pool, Sqlite};
use tracing::debug;

use crate::config::SqliteDatabaseConfig;
use crate::error::{Error, Result};
use crate::write_guard::WriteGuard;

/// SQLite database with connection pooling for concurrent reads and exclusive writes.
///
/// ## Architecture
///
/// The database maintains two connection pools:
/// - **`read_pool`**: Pool of read-only connections for concurrent reads
/// - **`write_conn`**: Single-connection pool for exclusive write access (enforced by max_connections=1)
///
/// Both pools are opened with the same foreign key and statement logging
/// policy, taken from [`SqliteDatabaseConfig`].
///
/// ## State Management
///
/// - **`wal_initialized`**: Tracks whether WAL journal mode has been enabled (lazy initialization)
/// - **`closed`**: Prevents use after the database has been closed
/// - **`path`**: Database file path for cleanup operations
///
/// ## Usage Pattern
///
/// ```text
/// 1. Connect to database (creates the file and both pools)
/// 2. Read operations: Access read_pool for concurrent reads
/// 3. Write operations: Acquire writer (lazily enables WAL on first call)
/// 4. Close database when done
/// ```
#[derive(Debug)]
pub struct SqliteDatabase {
   /// Pool of read-only connections (defaults to max_connections=6) for concurrent reads
   read_pool: Pool<Sqlite>,

   /// Single read-write connection pool (max_connections=1) for serialized writes
   write_conn: Pool<Sqlite>,

   /// Tracks if WAL mode has been initialized (set on first write)
   wal_initialized: AtomicBool,

   /// Marks database as closed to prevent further operations
   closed: AtomicBool,

   /// Whether connections were opened with `PRAGMA foreign_keys = ON`
   foreign_keys: bool,

   /// Path to database file (used for cleanup)
   path: PathBuf,
}

impl SqliteDatabase {
   /// Open (or create) the database file at `path`.
   ///
   /// The write pool is opened first so that the file exists before the
   /// read-only pool connects to it. Missing parent directories are created.
   pub async fn connect(
      path: impl AsRef<Path>,
      custom_config: Option<SqliteDatabaseConfig>,
   ) -> Result<Arc<Self>> {
      let path = path.as_ref().to_path_buf();
      let config = custom_config.unwrap_or_default();

      if let Some(parent) = path.parent()
         && !parent.as_os_str().is_empty()
      {
         tokio::fs::create_dir_all(parent).await?;
      }

      let write_options = connect_options(&path, &config).create_if_missing(true);
      let write_conn = SqlitePoolOptions::new()
         .max_connections(1)
         .idle_timeout(config.idle_timeout)
         .connect_with(write_options)
         .await
         .map_err(|source| connect_error(&path, source))?;

      let read_options = connect_options(&path, &config).read_only(true);
      let read_pool = SqlitePoolOptions::new()
         .max_connections(config.max_read_connections)
         .idle_timeout(config.idle_timeout)
         .connect_with(read_options)
         .await
         .map_err(|source| connect_error(&path, source))?;

      debug!(
         "Connected to {} (foreign_keys={}, log_statements={})",
         path.display(),
         config.foreign_keys,
         config.log_statements
      );

      Ok(Arc::new(Self {
         read_pool,
         write_conn,
         wal_initialized: AtomicBool::new(false),
         closed: AtomicBool::new(false),
         foreign_keys: config.foreign_keys,
         path,
      }))
   }

   /// Pool of read-only connections.
   pub fn read_pool(&self) -> Result<&Pool<Sqlite>> {
      self.ensure_open()?;
      Ok(&self.read_pool)
   }

   /// Acquire the single write connection.
   ///
   /// Waits while another [`WriteGuard`] is alive. The first acquisition
   /// switches the database to WAL journal mode.
   pub async fn acquire_writer(&self) -> Result<WriteGuard> {
      self.ensure_open()?;

      let mut conn = self.write_conn.acquire().await?;

      // Only one writer exists at a time, so a plain load/store is race free here
      if !self.wal_initialized.load(Ordering::Acquire) {
         sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&mut *conn)
            .await?;
         self.wal_initialized.store(true, Ordering::Release);
         debug!("Enabled WAL journal mode for {}", self.path.display());
      }

      Ok(WriteGuard::new(conn))
   }

   /// Whether connections enforce `REFERENCES` constraints.
   pub fn foreign_keys_enabled(&self) -> bool {
      self.foreign_keys
   }

   /// Path of the database file.
   pub fn path(&self) -> &Path {
      &self.path
   }

   /// Whether [`close`](Self::close) or [`remove`](Self::remove) has been called.
   pub fn is_closed(&self) -> bool {
      self.closed.load(Ordering::Acquire)
   }

   /// Close both pools. Calling this more than once is a no-op.
   pub async fn close(&self) -> Result<()> {
      if self.closed.swap(true, Ordering::AcqRel) {
         return Ok(());
      }

      self.read_pool.close().await;
      self.write_conn.close().await;
      debug!("Closed database {}", self.path.display());
      Ok(())
   }

   /// Close the database and delete its file along with the WAL and shared memory files.
   pub async fn remove(&self) -> Result<()> {
      self.close().await?;

      for file in [
         self.path.clone(),
         sibling(&self.path, "-wal"),
         sibling(&self.path, "-shm"),
      ] {
         match tokio::fs::remove_file(&file).await {
            Ok(()) => debug!("Removed {}", file.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Io(e)),
         }
      }

      Ok(())
   }

   fn ensure_open(&self) -> Result<()> {
      if self.is_closed() {
         return Err(Error::DatabaseClosed);
      }
      Ok(())
   }
}

fn connect_options(path: &Path, config: &SqliteDatabaseConfig) -> SqliteConnectOptions {
   let options = SqliteConnectOptions::new()
      .filename(path)
      .foreign_keys(config.foreign_keys);

   if config.log_statements {
      options.log_statements(LevelFilter::Info)
   } else {
      options.disable_statement_logging()
   }
}

fn connect_error(path: &Path, source: sqlx::Error) -> Error {
   Error::Connect {
      path: path.to_path_buf(),
      source,
   }
}

/// `library.db` + `-wal` -> `library.db-wal`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
   let mut name = OsString::from(path.as_os_str());
   name.push(suffix);
   PathBuf::from(name)
}
