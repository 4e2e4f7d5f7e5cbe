//! Error handling for the LIBRIS HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Payload failed schema validation; one message per violation
    #[error("validation error: {message}")]
    Validation {
        errors: Vec<String>,
        message: String,
    },

    #[error("conflict: {message}")]
    Conflict {
        details: Vec<Value>,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String },

    /// Request could not be interpreted at all (e.g. body is not JSON)
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(errors: Vec<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            errors,
            message: message.into(),
        }
    }

    pub fn conflict(details: Vec<Value>, message: impl Into<String>) -> Self {
        Self::Conflict {
            details,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Stable machine-readable code carried in the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::Conflict { .. } => "conflict",
            AppError::NotFound { .. } => "not_found",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();
        let status = self.status();
        let code = self.code();

        match &self {
            AppError::Internal(err) => tracing::error!(
                error_id = %error_id,
                error_code = code,
                status_code = status.as_u16(),
                error = ?err,
                "request failed"
            ),
            _ => tracing::warn!(
                error_id = %error_id,
                error_code = code,
                status_code = status.as_u16(),
                "request rejected: {}",
                self
            ),
        }

        let (message, details, errors) = match self {
            AppError::Validation { errors, message } => {
                let details: Vec<Value> = errors.iter().map(|e| Value::String(e.clone())).collect();
                (message, details, Some(errors))
            }
            AppError::Conflict { details, message } => (message, details, None),
            AppError::NotFound { message } | AppError::BadRequest { message } => {
                (message, Vec::new(), None)
            }
            // Internal details stay in the log in release builds
            AppError::Internal(err) => {
                let message = if cfg!(debug_assertions) {
                    err.to_string()
                } else {
                    "An internal server error occurred".to_string()
                };
                (message, Vec::new(), None)
            }
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message,
                "details": details,
                "trace_id": error_id.to_string(),
                "timestamp": timestamp
            }
        });
        if let Some(errors) = errors {
            body["errors"] = json!(errors);
        }

        (status, Json(body)).into_response()
    }
}
