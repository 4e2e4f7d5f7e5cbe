use serde::{Deserialize, Serialize};

/// A book record as stored in the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(deny_unknown_fields)]
pub struct Book {
    /// Primary key; always textual, never coerced to a number
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    /// Page count, at least 1
    pub pages: i64,
    pub publisher: String,
    pub title: String,
    pub year: i64,
}

/// `{"book": {...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub book: Book,
}

/// `{"books": [...]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

/// Body returned after a successful delete
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub msg: String,
}

impl DeletedResponse {
    pub const MESSAGE: &'static str = "DELETED!";

    pub fn new() -> Self {
        Self {
            msg: Self::MESSAGE.to_string(),
        }
    }
}

impl Default for DeletedResponse {
    fn default() -> Self {
        Self::new()
    }
}
