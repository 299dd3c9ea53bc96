// SPDX-License-Identifier: MIT

//! Application error types.
//!
//! Domain failures (validation, duplicate identity, ownership) are caught
//! at the handler boundary and turned into a redirect plus a flash
//! message; the `IntoResponse` impl here covers whatever escapes that
//! conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Username or email already exists")]
    DuplicateIdentity,

    #[error("Not authorized")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Amount must be a positive number")]
    InvalidAmount,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            // Unauthenticated access to a protected page goes back to login.
            AppError::Unauthorized => Redirect::to("/login").into_response(),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, format!("Not found: {msg}")).into_response()
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone()).into_response()
            }
            AppError::DuplicateIdentity | AppError::InvalidAmount => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
