//! Persistence for the `books` table.
//!
//! Every operation is one SQL statement; datastore errors other than the
//! unique-key violation on insert pass through untouched.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::models::Book;

const COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("book '{0}' not found")]
    NotFound(String),

    #[error("book '{0}' already exists")]
    Duplicate(String),

    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books in insertion order
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError>;

    async fn get_by_isbn(&self, isbn: &str) -> Result<Book, RepositoryError>;

    /// Insert a new row; `Duplicate` when the isbn is taken
    async fn create(&self, book: &Book) -> Result<Book, RepositoryError>;

    /// Replace every non-key column of the row identified by `isbn`.
    /// `book.isbn` is ignored; a row is never re-keyed.
    async fn update_by_isbn(&self, isbn: &str, book: &Book) -> Result<Book, RepositoryError>;

    async fn delete_by_isbn(&self, isbn: &str) -> Result<(), RepositoryError>;
}

/// [`BookRepository`] over a SQLite pool
#[derive(Debug, Clone)]
pub struct SqlBookRepository {
    pool: SqlitePool,
}

impl SqlBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn list_all(&self) -> Result<Vec<Book>, RepositoryError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {COLUMNS} FROM books ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Book, RepositoryError> {
        sqlx::query_as::<_, Book>(&format!("SELECT {COLUMNS} FROM books WHERE isbn = ?"))
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))
    }

    async fn create(&self, book: &Book) -> Result<Book, RepositoryError> {
        let result = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(RepositoryError::Duplicate(book.isbn.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update_by_isbn(&self, isbn: &str, book: &Book) -> Result<Book, RepositoryError> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET
                amazon_url = ?, author = ?, language = ?, pages = ?,
                publisher = ?, title = ?, year = ?
            WHERE isbn = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))
    }

    async fn delete_by_isbn(&self, isbn: &str) -> Result<(), RepositoryError> {
        let deleted: Option<String> =
            sqlx::query_scalar("DELETE FROM books WHERE isbn = ? RETURNING isbn")
                .bind(isbn)
                .fetch_optional(&self.pool)
                .await?;

        deleted
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))
    }
}
