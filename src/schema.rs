//! DDL for the `authors` and `books` tables

/// Table holding [`Author`](crate::Author) rows.
pub const AUTHORS_TABLE: &str = "authors";
/// Table holding [`Book`](crate::Book) rows.
pub const BOOKS_TABLE: &str = "books";

/// Statements run, in order, inside one transaction by
/// [`LibraryStore::reset_schema`](crate::LibraryStore::reset_schema).
///
/// `books` is dropped before `authors` so the drop never trips the foreign key.
pub(crate) const RESET_STATEMENTS: &[&str] = &[
   "DROP TABLE IF EXISTS books",
   "DROP TABLE IF EXISTS authors",
   r#"
   CREATE TABLE authors (
      id INTEGER NOT NULL PRIMARY KEY,
      name VARCHAR NOT NULL UNIQUE
   )
   "#,
   r#"
   CREATE TABLE books (
      id INTEGER NOT NULL PRIMARY KEY,
      title VARCHAR NOT NULL UNIQUE,
      author_id INTEGER NOT NULL REFERENCES authors (id)
   )
   "#,
];
