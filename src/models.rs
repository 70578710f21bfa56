use serde::{Deserialize, Serialize};

/// A row of the `authors` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Author {
   pub id: i64,
   pub name: String,
}

/// A row of the `books` table.
///
/// `author_id` references [`Author::id`]; whether that is checked depends on
/// the store's foreign key setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
   pub id: i64,
   pub title: String,
   pub author_id: i64,
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   #[test]
   fn test_book_serializes_with_column_names() {
      let book = Book {
         id: 1,
         title: "Book 1".into(),
         author_id: 1,
      };
      assert_eq!(
         serde_json::to_value(&book).unwrap(),
         json!({ "id": 1, "title": "Book 1", "author_id": 1 })
      );
   }
}
