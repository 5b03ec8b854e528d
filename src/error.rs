// error.rs
// Error types for the TOTP core and the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures inside the codec. Never shown to users: the verifier turns them into "no match".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TotpError {
    #[error("invalid base32 character at position {position}")]
    InvalidBase32Character { position: usize },
    #[error("secret is empty")]
    EmptySecret,
}

/// Secret provisioning cannot continue without a secure random source.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("secure random source unavailable: {0}")]
    Randomness(String),
}

/// Errors surfaced by route handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no factor enrolled for this account")]
    FactorNotFound,
    #[error("too many verification attempts, retry in {retry_after_secs}s")]
    TooManyAttempts { retry_after_secs: u64 },
    #[error("account is required")]
    MissingAccount,
    #[error("unknown factor kind")]
    UnknownFactor,
    #[error(transparent)]
    Provision(#[from] ProvisionError),
    #[error("failed to build enrollment QR code")]
    QrCode,
    #[error("failed to build otpauth url")]
    OtpauthUrl,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::FactorNotFound => StatusCode::NOT_FOUND,
            AppError::TooManyAttempts { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::MissingAccount | AppError::UnknownFactor => StatusCode::BAD_REQUEST,
            AppError::Provision(_) | AppError::QrCode | AppError::OtpauthUrl => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
