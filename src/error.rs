//! # Error Handling
//!
//! Unified error handling for the registry service: a problem+json response
//! type for the HTTP layer and a repository error for the data access layer.

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::telemetry;

/// Unified API error response structure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip)]
    pub status: StatusCode,
    /// Error code for programmatic handling
    pub code: Box<str>,
    /// Human-readable error message
    pub message: Box<str>,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<serde_json::Value>>,
    /// Correlation trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<Box<str>>,
}

impl ApiError {
    /// Create a new API error with the given status code and message
    pub fn new<S: Into<String>>(status: StatusCode, code: S, message: S) -> Self {
        Self {
            status,
            code: code.into().into_boxed_str(),
            message: message.into().into_boxed_str(),
            details: None,
            trace_id: Self::current_trace_id(),
        }
    }

    /// Extract the request trace ID (falls back to a generated correlation ID)
    fn current_trace_id() -> Option<Box<str>> {
        telemetry::current_trace_id()
            .map(|trace_id| trace_id.into_boxed_str())
            .or_else(|| {
                Some(format!("corr-{}", &uuid::Uuid::new_v4().to_string()[..8]).into_boxed_str())
            })
    }
}

/// Standard error types with predefined status codes
#[derive(Debug, Error)]
pub enum ErrorType {
    #[error("Not Found")]
    NotFound,
    #[error("Service Unavailable")]
    ServiceUnavailable,
}

impl ErrorType {
    /// Get the appropriate HTTP status code for this error type
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error code string for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorType::NotFound => "NOT_FOUND",
            ErrorType::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/problem+json"),
        );

        (self.status, headers, axum::Json(self)).into_response()
    }
}

// Error mappers for common sources

impl From<ErrorType> for ApiError {
    fn from(error_type: ErrorType) -> Self {
        Self::new(
            error_type.status_code(),
            error_type.error_code(),
            &error_type.to_string(),
        )
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:?}", error);

        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "An internal error occurred",
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing 'Content-Type: application/json' header".to_string()
            }
            _ => "Invalid request body".to_string(),
        };

        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &message)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(error: sea_orm::DbErr) -> Self {
        match error {
            sea_orm::DbErr::RecordNotFound(record) => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                &format!("Record not found: {}", record),
            ),
            sea_orm::DbErr::Conn(connection_err) => {
                tracing::error!("Database connection error: {:?}", connection_err);
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Database service unavailable",
                )
            }
            _ => {
                tracing::error!("Database error: {:?}", error);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Database error occurred",
                )
            }
        }
    }
}

/// Errors raised by the repository layer
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl RepositoryError {
    /// Wrap a SeaORM error; usable directly in `map_err`
    pub fn database_error(error: sea_orm::DbErr) -> Self {
        Self::Database(error)
    }

    pub fn validation_error<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &str, id: i32) -> Self {
        Self::NotFound(format!("{} {} not found", entity, id))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(msg) => {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", &msg)
            }
            RepositoryError::Validation(msg) => {
                ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &msg)
            }
            RepositoryError::Database(db_err) => db_err.into(),
        }
    }
}
