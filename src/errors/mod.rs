//! Error handling module for the LogiTag backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const AUTH_ERROR: &str = "AUTH_ERROR";
    pub const DUPLICATE_ACCOUNT: &str = "DUPLICATE_ACCOUNT";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const AUTH_REQUIRED: &str = "AUTH_REQUIRED";
    pub const NO_TAG_FOUND: &str = "NO_TAG_FOUND";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Bad user input, rejected before any database call
    Validation(String),
    /// Generic authentication failure
    Auth(String),
    /// Sign-up with an email that already has an account
    DuplicateAccount(String),
    /// Sign-in with an unknown email or wrong password
    InvalidCredentials(String),
    /// Unauthenticated access to a gated flow
    AuthRequired(String),
    /// Read flow invoked with an empty tag set
    NoTagFound(String),
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateAccount(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthRequired(_) => StatusCode::UNAUTHORIZED,
            AppError::NoTagFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Auth(_) => codes::AUTH_ERROR,
            AppError::DuplicateAccount(_) => codes::DUPLICATE_ACCOUNT,
            AppError::InvalidCredentials(_) => codes::INVALID_CREDENTIALS,
            AppError::AuthRequired(_) => codes::AUTH_REQUIRED,
            AppError::NoTagFound(_) => codes::NO_TAG_FOUND,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Auth(msg) => msg.clone(),
            AppError::DuplicateAccount(msg) => msg.clone(),
            AppError::InvalidCredentials(msg) => msg.clone(),
            AppError::AuthRequired(msg) => msg.clone(),
            AppError::NoTagFound(msg) => msg.clone(),
            AppError::Database(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        AppError::Internal("Password hashing failed".to_string())
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
