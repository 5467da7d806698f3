//! Typed errors and HTTP mapping.

use crate::response::error_body;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the key-value layer underneath the schema store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("storage lock poisoned")]
    Poisoned,
    #[error("corrupt snapshot: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Module-definition failures. Validation messages are user facing.
#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("module not found: {0}")]
    UnknownModule(String),
}

/// Generic form failures. Messages are shown to the user as-is.
#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("Los siguientes campos son requeridos: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
    #[error("Campo desconocido: {0}")]
    UnknownField(String),
    #[error("Valor inválido para {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Invalid process configuration. Fatal at startup.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, details) = match &self {
            AppError::Schema(SchemaError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                Some(serde_json::json!({ "errors": errors })),
            ),
            AppError::Schema(SchemaError::UnknownModule(_)) => (StatusCode::NOT_FOUND, "not_found", None),
            AppError::Form(FormError::MissingRequired(fields)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "missing_required",
                Some(serde_json::json!({ "missing": fields })),
            ),
            AppError::Form(FormError::UnknownField(field)) | AppError::Form(FormError::InvalidValue { field, .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_value",
                Some(serde_json::json!({ "field": field })),
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", None),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(error_body(code, self.to_string(), details))).into_response()
    }
}
