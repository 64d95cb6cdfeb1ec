use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::model::attendance::CheckType;

/// Failures raised by an `HrStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("inconsistent store state: {0}")]
    Inconsistent(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Validation(String),

    #[error("{check_type} punch already recorded within the last {window_minutes} minutes, please wait")]
    DuplicatePunch {
        check_type: CheckType,
        window_minutes: i64,
    },

    #[error("PIN does not match an active employee")]
    InvalidPin,

    #[error("{0} not found")]
    NotFound(String),

    #[error("request has already been processed")]
    AlreadyProcessed,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(resource: &str, id: u64) -> Self {
        AppError::NotFound(format!("{} {}", resource, id))
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Store(_) => "INTERNAL_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::DuplicatePunch { .. } => "DUPLICATE_PUNCH",
            AppError::InvalidPin => "INVALID_PIN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyProcessed => "ALREADY_PROCESSED",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicatePunch { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::InvalidPin | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyProcessed => StatusCode::CONFLICT,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // store details stay in the logs
        let message = match self {
            AppError::Store(e) => {
                tracing::error!(error = %e, "Store failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "message": message,
        }))
    }
}
