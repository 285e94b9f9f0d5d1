use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy exposed by the core. A presentation layer may branch on
/// these categories and nothing finer: `Database` and `Internal` collapse
/// into one opaque internal-fault signal on the wire.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("record not found")]
    NotFound,

    #[error("resource already exists")]
    Conflict,

    #[error("username already exists")]
    DuplicateUsername,

    #[error("email already exists")]
    DuplicateEmail,

    #[error("invalid or missing credentials")]
    Unauthorized,

    #[error("insufficient privileges")]
    Forbidden,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Stable outward message per category. Internal faults never leak
    /// diagnostic detail (SQL text, stack traces); that goes to the log.
    fn outward_message(&self) -> &str {
        match self {
            AppError::NotFound => "record not found",
            AppError::Conflict => "resource already exists",
            AppError::DuplicateUsername => "username already exists",
            AppError::DuplicateEmail => "email already exists",
            AppError::Unauthorized => "invalid or missing credentials",
            AppError::Forbidden => "insufficient privileges",
            AppError::Validation(msg) => msg,
            AppError::Database(_) | AppError::Internal(_) => "internal server error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::DuplicateUsername | AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal fault");
        }

        let status = self.status_code();
        HttpResponse::build(status).json(json!({
            "error": self.outward_message(),
            "status": status.as_u16(),
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_err: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthorized
    }
}
