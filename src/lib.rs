// lib.rs
// TOTP second factor: the codec and verifier, the factor abstraction, and the HTTP service.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod factor;
pub mod routes;
pub mod state;
pub mod totp;

/// Endpoints:
/// - GET  /factors                  -> available factor kinds
/// - POST /factors/{account}/delete -> remove an account's factor
/// - GET  /secret                   -> a fresh secret (no persistence)
/// - POST /enroll                   -> two-round enrollment
/// - POST /login                    -> verify a code for an enrolled account
pub fn build_router(state: Arc<state::AppState>) -> Router {
    Router::new()
        .route("/factors", get(routes::factors_index))
        .route("/factors/{account}/delete", post(routes::factor_delete))
        .route("/secret", get(routes::secret_generate))
        .route("/enroll", post(routes::enroll))
        .route("/login", post(routes::login))
        .with_state(state)
}
