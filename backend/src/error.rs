//! Error handling for the Gas Certificate Manager
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::FieldError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired")]
    SessionExpired,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Single-field validation error
    pub fn invalid(field: &str, code: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError {
            field: field.to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }])
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(format!("serialization failed: {}", err))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing failed: {}", err))
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorDetail {
    fn new(code: &str, message_en: impl Into<String>, message_es: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message_en: message_en.into(),
            message_es: message_es.into(),
            field: None,
            fields: Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new(
                    "INVALID_CREDENTIALS",
                    "Invalid username or password",
                    "Usuario o contraseña incorrectos",
                ),
            ),
            AppError::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new(
                    "SESSION_EXPIRED",
                    "Session has expired",
                    "La sesión ha caducado",
                ),
            ),
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", message.clone(), "No autorizado"),
            ),
            AppError::Validation(fields) => {
                let mut detail = ErrorDetail::new(
                    "VALIDATION_ERROR",
                    "Some fields are invalid",
                    fields
                        .first()
                        .map(|f| f.message.clone())
                        .unwrap_or_else(|| "Datos no válidos".to_string()),
                );
                detail.field = fields.first().map(|f| f.field.clone());
                detail.fields = fields.clone();
                (StatusCode::BAD_REQUEST, detail)
            }
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new(
                    "NOT_FOUND",
                    format!("{} not found", resource),
                    format!("No se encontró el recurso solicitado ({})", resource),
                ),
            ),
            AppError::Storage(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new(
                    "STORAGE_ERROR",
                    format!("Storage error: {}", msg),
                    "No se pudieron guardar los datos",
                ),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone(), "Error interno del servidor"),
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for services and handlers
pub type AppResult<T> = Result<T, AppError>;
