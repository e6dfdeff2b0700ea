use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Every way a request can fail, one variant per failure kind. Handlers
/// match on these exhaustively instead of improvising status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, rejected before touching storage.
    #[error("{0}")]
    Validation(String),
    /// Email or username collided with an existing account.
    #[error("email or username already exists")]
    IdentityConflict,
    /// Unknown user or wrong password. Deliberately one variant so the
    /// response never reveals which.
    #[error("incorrect username or password")]
    InvalidCredentials,
    /// Bad signature, malformed payload, or missing subject claim.
    #[error("invalid token")]
    InvalidToken,
    /// Well-formed token with a valid signature, past its expiry.
    #[error("token has expired")]
    TokenExpired,
    /// Valid token whose account no longer exists.
    #[error("user not found")]
    AccountNotFound,
    #[error("storage unavailable")]
    Storage(#[from] sqlx::Error),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::IdentityConflict => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::InvalidToken | ApiError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::AccountNotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Server faults are logged with their cause but never echoed back.
        let detail = match &self {
            ApiError::Storage(e) => {
                error!(error = %e, "storage failure");
                "internal server error".to_string()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
