// routes/factors.rs
// GET /factors -> available factor kinds.
// POST /factors/{account}/delete -> removes an account's confirmed factor.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::state::{AppState, delete_factor};

pub async fn factors_index(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "factors": st.registry.list() }))
}

pub async fn factor_delete(
    State(st): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !delete_factor(&st, &account) {
        return Err(AppError::FactorNotFound);
    }
    tracing::info!(account = %account, "factor removed");
    Ok(Json(serde_json::json!({ "ok": true })))
}
