//! HTTP handlers for `/books`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use libris_http::error::AppError;

use super::models::{BookResponse, BooksResponse, DeletedResponse};
use super::repository::{BookRepository, RepositoryError};
use super::schema::{BookValidator, Operation, ValidationErrors};

/// Shared state for the books handlers
#[derive(Clone)]
pub struct BooksState {
    pub repo: Arc<dyn BookRepository>,
    pub validator: Arc<BookValidator>,
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => AppError::not_found(err.to_string()),
            RepositoryError::Duplicate(ref isbn) => AppError::conflict(
                vec![serde_json::json!({ "field": "isbn", "value": isbn })],
                err.to_string(),
            ),
            RepositoryError::Database(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        let message = format!("invalid book payload for {}", err.operation);
        AppError::validation(err.messages, message)
    }
}

pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(state)
}

/// Unwrap a JSON body, turning extractor rejections into our error envelope
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

async fn list_books(State(state): State<BooksState>) -> Result<Json<BooksResponse>, AppError> {
    let books = state.repo.list_all().await?;
    tracing::debug!(count = books.len(), "listed books");
    Ok(Json(BooksResponse { books }))
}

async fn get_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
) -> Result<Json<BookResponse>, AppError> {
    let book = state.repo.get_by_isbn(&isbn).await?;
    Ok(Json(BookResponse { book }))
}

async fn create_book(
    State(state): State<BooksState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    let book = state
        .validator
        .validate(Operation::Create, json_body(payload)?)?;

    let book = state.repo.create(&book).await?;
    tracing::info!(isbn = %book.isbn, op = "create", "book created");

    Ok((StatusCode::CREATED, Json(BookResponse { book })))
}

async fn update_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookResponse>, AppError> {
    let replacement = state
        .validator
        .validate(Operation::Update, json_body(payload)?)?;

    if replacement.isbn != isbn {
        tracing::debug!(
            %isbn,
            body_isbn = %replacement.isbn,
            "body isbn differs from path; path wins"
        );
    }

    let book = state.repo.update_by_isbn(&isbn, &replacement).await?;
    tracing::info!(isbn = %book.isbn, op = "update", "book updated");

    Ok(Json(BookResponse { book }))
}

async fn delete_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    state.repo.delete_by_isbn(&isbn).await?;
    tracing::info!(%isbn, op = "delete", "book deleted");

    Ok(Json(DeletedResponse::new()))
}
