//! Unified error handling for the data layer and the HTTP gateway.
//!
//! Every operation returns [`AppResult`]. The error keeps its [`ErrorKind`]
//! all the way to the caller, and can be rendered as an Axum HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Coarse classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or unusable configuration, fatal at first use
    Configuration,
    /// The targeted record does not exist
    NotFound,
    /// Constraint violation: missing field, bad value, uniqueness collision
    Validation,
    /// Database driver, network, timeout or cache failure
    Transport,
    /// Request identity could not be established (gateway only)
    Auth,
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    // Transport
    #[error("Timed out: {0}")]
    Timeout(String),

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[source] sea_orm::DbErr),

    #[cfg(feature = "cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    // Authentication
    #[error("Authentication required")]
    Unauthorized,

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Configuration(_) => ErrorKind::Configuration,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) | AppError::Conflict(_) => ErrorKind::Validation,
            AppError::Timeout(_) => ErrorKind::Transport,
            #[cfg(feature = "database")]
            AppError::Database(_) => ErrorKind::Transport,
            #[cfg(feature = "cache")]
            AppError::Cache(_) => ErrorKind::Transport,
            AppError::Unauthorized => ErrorKind::Auth,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => ErrorKind::Auth,
        }
    }

    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Timeout(_) => "TIMEOUT",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "cache")]
            AppError::Cache(_) => "CACHE_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "AUTH_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(_) | AppError::Unauthorized => self.to_string(),
            AppError::Conflict(_) => "Record already exists".to_string(),
            AppError::Configuration(_) => "The service is not configured".to_string(),
            AppError::Timeout(_) => "The service is temporarily unavailable".to_string(),
            #[cfg(feature = "database")]
            AppError::Database(_) => "A database error occurred".to_string(),
            #[cfg(feature = "cache")]
            AppError::Cache(_) => "A cache error occurred".to_string(),
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => "Invalid or expired token".to_string(),
        }
    }
}

/// Log an error raised inside `operation` and hand it back unchanged.
///
/// Used at every operation boundary as `.map_err(handle_error("op"))`, so all
/// failures are logged in one place while the caller still sees the kind.
pub fn handle_error(operation: &'static str) -> impl Fn(AppError) -> AppError {
    move |err| {
        match err.kind() {
            ErrorKind::NotFound | ErrorKind::Validation | ErrorKind::Auth => {
                tracing::warn!(operation, kind = ?err.kind(), error = %err, "Operation failed");
            }
            ErrorKind::Configuration | ErrorKind::Transport => {
                tracing::error!(operation, kind = ?err.kind(), error = ?err, "Operation failed");
            }
        }
        err
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
            _ => AppError::Database(err),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::UnknownTransformation(_) => AppError::Validation(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        // Report the first message, in field order for stable output
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation failed".to_string());

        AppError::Validation(message)
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(entity.to_string()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        AppError::Timeout(msg.into())
    }
}
