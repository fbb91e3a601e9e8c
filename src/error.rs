use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::recommend::RecommendError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Recommend(RecommendError::UnknownUser { .. }) => StatusCode::NOT_FOUND,
            AppError::Recommend(
                RecommendError::UnseenLabel { .. } | RecommendError::Coercion { .. },
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Recommend(RecommendError::Model(_))
            | AppError::Database(_)
            | AppError::Cache(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::NotFound(msg)
            | AppError::InvalidInput(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg) => msg,
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        }

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
