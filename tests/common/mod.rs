use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt; // for oneshot

use totpfactor::{
    build_router,
    config::Config,
    state::{AppState, init_state},
    totp::{base32, compute_code, time_step, unix_now},
};

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

pub fn setup_app(max_attempts: u32) -> TestApp {
    let config = Config {
        issuer: "TestIssuer".to_string(),
        max_attempts,
        attempt_window: Duration::from_secs(60),
        ..Config::default()
    };
    let state = Arc::new(init_state(config));
    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

/// Code an authenticator app would show right now for `key`.
pub fn current_code(key: &str) -> String {
    code_at_offset(key, 0)
}

/// Code for the step `offset` steps away from now.
pub fn code_at_offset(key: &str, offset: i64) -> String {
    let bytes = base32::decode(key).unwrap();
    let step = time_step(unix_now()).checked_add_signed(offset).unwrap();
    compute_code(&bytes, step).unwrap().to_string()
}

/// A well-formed code that matches none of the steps around now.
pub fn wrong_code(key: &str) -> String {
    let bytes = base32::decode(key).unwrap();
    let current = time_step(unix_now());
    let window: Vec<String> = (current - 3..=current + 3)
        .map(|step| compute_code(&bytes, step).unwrap().to_string())
        .collect();
    (0..1_000_000u32)
        .map(|n| format!("{n:06}"))
        .find(|candidate| !window.contains(candidate))
        .unwrap()
}
