//! Error taxonomy shared by the auth core and the HTTP layer.
//!
//! Every variant is terminal for the request that raised it. Guard failures are
//! raised before the protected handler runs, so no variant implies a partial write.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::token::TokenError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Email is already registered")]
    DuplicateEmail,

    /// Same message whether the email is unknown or the password is wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Bearer token is required")]
    MissingToken,

    /// Covers malformed, badly signed and expired tokens alike.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token type is not accepted here")]
    WrongTokenType,

    #[error("User not found")]
    UserNotFound,

    #[error("No authenticated identity on request")]
    MissingIdentity,

    #[error("Insufficient role")]
    InsufficientRole,

    #[error("Resource not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ErrorBody
///
/// JSON shape of every rejection sent to a client.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::InvalidToken
            | AppError::WrongTokenType
            | AppError::UserNotFound => StatusCode::UNAUTHORIZED,
            AppError::MissingIdentity | AppError::InsufficientRole => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to a client. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        let status = self.status_code();
        ErrorBody {
            status_code: status.as_u16(),
            message: self.public_message(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Internal(msg) => tracing::error!(detail = %msg, "internal error"),
            AppError::InvalidCredentials => tracing::warn!("rejected login attempt"),
            AppError::MissingIdentity => {
                tracing::error!("role-gated route reached without an authenticated identity")
            }
            _ => tracing::debug!(error = %self, "request rejected"),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::Expired => AppError::InvalidToken,
            TokenError::WrongType => AppError::WrongTokenType,
            TokenError::Encoding(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        (self.status_code(), Json(self.body())).into_response()
    }
}
