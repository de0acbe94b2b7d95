use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use genai::GenaiError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `PROVIDER_ERROR`, `OUTPUT_NOT_LOCATED`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Either image_data or image_url must be provided")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Missing or invalid input. Never retried.
    Validation(String),
    /// A referenced entity does not exist.
    NotFound(String),
    /// The generative provider failed; carries its message verbatim.
    /// Not retried automatically — the caller must resubmit.
    Provider(String),
    /// A completed job's output could not be found after the bounded
    /// search budget was exhausted.
    OutputNotLocated(String),
    Internal(String),
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
            AppError::Provider(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "PROVIDER_ERROR",
                    message: msg,
                },
            ),
            AppError::OutputNotLocated(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "OUTPUT_NOT_LOCATED",
                    message: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
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

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {key}")),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<GenaiError> for AppError {
    fn from(err: GenaiError) -> Self {
        match err {
            GenaiError::OutputNotLocated { .. } => AppError::OutputNotLocated(err.to_string()),
            GenaiError::Storage(inner) => inner.into(),
            // Provider-side failures surface verbatim for resubmission.
            other => AppError::Provider(other.to_string()),
        }
    }
}
