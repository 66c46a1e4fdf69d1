//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config path not available (pass --config or set CONFIG_PATH)")]
    MissingPath,
    #[error("config file does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no student found with id: {0}")]
    NotFound(i64),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("database: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("unsupported db driver: '{driver}' (supported: {})", .supported.join(", "))]
    UnsupportedDriver {
        driver: String,
        supported: &'static [&'static str],
    },
    #[error("{0} not provided in config")]
    MissingConfig(&'static str),
    #[error("invalid storage config: {0}")]
    InvalidConfig(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StorageError::ConstraintViolation(db.message().to_string())
            }
            other => StorageError::Connection(other),
        }
    }
}

impl StorageError {
    fn code(&self) -> &'static str {
        match self {
            StorageError::NotFound(_) => "not_found",
            StorageError::ConstraintViolation(_) => "conflict",
            StorageError::Connection(_) => "database_error",
            StorageError::UnsupportedDriver { .. }
            | StorageError::MissingConfig(_)
            | StorageError::InvalidConfig(_) => "config_error",
        }
    }
}

/// One failing field from request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("validation: {}", join_messages(.0))]
    Validation(Vec<FieldError>),
    /// Storage failure reported to the client as a bad request.
    #[error("{0}")]
    Rejected(StorageError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::Rejected(e) => (StatusCode::BAD_REQUEST, e.code()),
            AppError::Storage(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.code()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let details = match &self {
            AppError::Validation(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
