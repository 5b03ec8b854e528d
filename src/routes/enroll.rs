// routes/enroll.rs
// POST /enroll { "account", "key"?, "code"?, "submitted" } -> pending (with key + QR) or confirmed.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::factor::{
    EnrollmentOutcome, EnrollmentRequest, PendingEnrollment, TOTP_FACTOR_KEY,
};
use crate::routes::qrcode::qr_png_base64;
use crate::state::{AppState, save_factor};
use crate::totp::{TotpSecret, otpauth_url, unix_now};

fn default_factor() -> String {
    TOTP_FACTOR_KEY.to_string()
}

#[derive(Deserialize)]
pub struct EnrollBody {
    pub account: String,
    #[serde(default = "default_factor")]
    pub factor: String,
    pub key: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub submitted: bool,
}

/// Round one (no key, not submitted) hands out a new key; round two checks the code.
pub async fn enroll(
    State(st): State<Arc<AppState>>,
    Json(body): Json<EnrollBody>,
) -> Result<Response, AppError> {
    let account = body.account.trim().to_string();
    if account.is_empty() {
        return Err(AppError::MissingAccount);
    }
    let factor = st.registry.get(&body.factor).ok_or(AppError::UnknownFactor)?;

    let request = EnrollmentRequest {
        account: account.clone(),
        key: body.key.map(TotpSecret::new),
        code: body.code,
        submitted: body.submitted,
    };

    match factor.enroll(request, unix_now())? {
        EnrollmentOutcome::Confirmed {
            factor: confirmed,
            counter,
        } => {
            let body = serde_json::json!({
                "status": "confirmed",
                "account": confirmed.account,
                "factor_id": confirmed.id,
                "factor": confirmed.factor_key,
                "name": confirmed.name,
                "created_at": confirmed.created_at,
            });
            save_factor(&st, confirmed, counter);
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        EnrollmentOutcome::Pending(pending) => pending_response(&st, &account, pending),
    }
}

fn pending_response(
    st: &AppState,
    account: &str,
    pending: PendingEnrollment,
) -> Result<Response, AppError> {
    let url = otpauth_url(&st.config.issuer, account, &pending.secret).map_err(|e| {
        tracing::warn!(error = %e, "cannot build otpauth url for submitted key");
        AppError::OtpauthUrl
    })?;
    let qr = qr_png_base64(&url)?;

    // display boundary: the only response that carries the raw key
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "pending",
            "account": account,
            "key": pending.secret.expose(),
            "otpauth_url": url,
            "qr_png_base64": qr,
            "code_error": pending.code_error.map(|e| e.label()),
        })),
    )
        .into_response())
}
