use crate::db::errors::DbError;
use crate::types::Operation;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use thiserror::Error as ThisError;

/// Why a request could not be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No `Authorization: Bearer <token>` header
    MissingToken,
    /// Bad signature or malformed token
    InvalidToken,
    ExpiredToken,
    /// The token was valid but its subject no longer exists
    SubjectNotFound,
    /// Login with an unknown username or wrong password
    InvalidCredentials,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            AuthFailure::MissingToken => "Token is missing",
            AuthFailure::InvalidToken => "Invalid token",
            AuthFailure::ExpiredToken => "Token expired, please log in again",
            AuthFailure::SubjectNotFound => "User not found",
            AuthFailure::InvalidCredentials => "Invalid username or password",
        };
        f.write_str(message)
    }
}

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but missing or not accepted
    #[error("Not authenticated: {reason}")]
    Unauthenticated { reason: AuthFailure },

    /// User lacks required permissions for the operation
    #[error("Insufficient permissions to {action} {resource}")]
    InsufficientPermissions { action: Operation, resource: String },

    /// Invalid request data
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Store operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// Conflict error, e.g. a username that is already taken
    #[error("Conflict: {message}")]
    Conflict { message: String },
}

impl Error {
    pub fn unauthenticated(reason: AuthFailure) -> Self {
        Error::Unauthenticated { reason }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { reason } => reason.to_string(),
            Error::InsufficientPermissions { action, resource } => {
                format!("Insufficient permissions to {action} {resource}")
            }
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => {
                format!("{resource} with ID {id} not found")
            }
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::UniqueViolation { constraint, table, .. } => match (table.as_deref(), constraint.as_deref()) {
                    (Some("users"), Some(c)) if c.contains("username") => "Username already exists".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::Other(_) => "Internal server error".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
            Error::Conflict { message } => message.clone(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::InsufficientPermissions { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Conflict { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
        }

        let status = self.status_code();
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

/// Malformed, missing, or wrongly typed JSON bodies
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        Error::bad_request("Invalid or missing JSON data")
    }
}

/// Path parameters that do not parse, e.g. a non-numeric ticket id
impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::bad_request(rejection.body_text())
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
