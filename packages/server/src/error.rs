use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::quiz::QuizError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `ALREADY_REGISTERED`, `STATE_MISMATCH`, `INVALID_ANSWER_FORMAT`,
    /// `STORE_UNAVAILABLE`.
    #[schema(example = "NOT_FOUND")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Quiz 'xmas' not found")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    AlreadyRegistered(String),
    /// Client-reported progress disagrees with the stored record.
    StateMismatch(String),
    InvalidAnswerFormat(String),
    StoreUnavailable(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::AlreadyRegistered(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "ALREADY_REGISTERED",
                    message: msg,
                },
            ),
            AppError::StateMismatch(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "STATE_MISMATCH",
                    message: msg,
                },
            ),
            AppError::InvalidAnswerFormat(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "INVALID_ANSWER_FORMAT",
                    message: msg,
                },
            ),
            AppError::StoreUnavailable(detail) => {
                tracing::error!("Store unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        code: "STORE_UNAVAILABLE",
                        message: "The quiz store is unavailable, please try again".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::NotFound(_) => AppError::NotFound(err.to_string()),
            QuizError::AlreadyRegistered { .. } => {
                tracing::warn!("Rejected registration: {err}");
                AppError::AlreadyRegistered(err.to_string())
            }
            QuizError::InvalidAnswerFormat(e) => AppError::InvalidAnswerFormat(e.to_string()),
            QuizError::StateMismatch(e) => {
                tracing::warn!("Progress mismatch: {e}");
                AppError::StateMismatch(e.to_string())
            }
            QuizError::Validation(msg) => AppError::Validation(msg),
            QuizError::StoreUnavailable(e) => AppError::StoreUnavailable(e.to_string()),
        }
    }
}
