// routes/login.rs
// POST /login { "account": "...", "code": "123456" } -> { "ok": true|false }

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::state::{AppState, find_factor};
use crate::totp::unix_now;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub account: String,
    #[serde(default)]
    pub code: String,
}

/// Verifies the code against the account's factor (±2 steps), then rejects
/// replays of an already accepted step and throttles repeated attempts.
pub async fn login(
    State(st): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let account = body.account.trim();
    if account.is_empty() {
        return Err(AppError::MissingAccount);
    }
    if let Err(retry_after_secs) = st.guard.check_attempt(account) {
        tracing::warn!(account = %account, retry_after_secs, "verification throttled");
        return Err(AppError::TooManyAttempts { retry_after_secs });
    }

    let factor = find_factor(&st, account).ok_or(AppError::FactorNotFound)?;
    let kind = st
        .registry
        .get(factor.factor_key)
        .ok_or(AppError::UnknownFactor)?;

    let accepted = match kind.verify(&factor, &body.code, unix_now()) {
        Some(step) if st.guard.try_consume(factor.id, step) => true,
        Some(_) => {
            tracing::warn!(account = %account, factor = %factor.id, "replayed code rejected");
            false
        }
        None => false,
    };

    if accepted {
        tracing::info!(account = %account, factor = %factor.id, "second factor verified");
        Ok((StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response())
    } else {
        tracing::info!(account = %account, factor = %factor.id, "second factor rejected");
        Ok((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "ok": false })),
        )
            .into_response())
    }
}
