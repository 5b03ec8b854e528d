// routes/secret.rs
// GET /secret -> returns a fresh Base32 secret; DOES NOT persist.

use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::error::AppError;
use crate::totp::{SECRET_BYTES, generate_secret};

/// Only generates and returns a secret. No I/O or persistence.
pub async fn secret_generate() -> Result<impl IntoResponse, AppError> {
    let secret = generate_secret()?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "secret": secret.expose(),
            "bytes": SECRET_BYTES,
        })),
    ))
}
