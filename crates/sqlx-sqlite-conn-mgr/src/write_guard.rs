//! Exclusive write access to a [`SqliteDatabase`](crate::SqliteDatabase)

use std::ops::{Deref, DerefMut};

use sqlx::Sqlite;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqliteConnection;

/// RAII guard over the single write connection.
///
/// The write pool holds exactly one connection, so while a `WriteGuard` is
/// alive every other writer waits in [`acquire_writer`](crate::SqliteDatabase::acquire_writer).
/// Dropping the guard returns the connection to the pool, on success and on
/// error paths alike.
///
/// Derefs to [`SqliteConnection`], so it can be used directly as an executor:
///
/// ```text
/// let mut writer = db.acquire_writer().await?;
/// sqlx::query("INSERT INTO t VALUES (1)").execute(&mut *writer).await?;
/// ```
#[must_use = "if unused, the write connection is immediately released"]
#[derive(Debug)]
pub struct WriteGuard {
   conn: PoolConnection<Sqlite>,
}

impl WriteGuard {
   pub(crate) fn new(conn: PoolConnection<Sqlite>) -> Self {
      Self { conn }
   }
}

impl Deref for WriteGuard {
   type Target = SqliteConnection;

   fn deref(&self) -> &Self::Target {
      &self.conn
   }
}

impl DerefMut for WriteGuard {
   fn deref_mut(&mut self) -> &mut Self::Target {
      &mut self.conn
   }
}
