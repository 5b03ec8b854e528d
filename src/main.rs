// main.rs
// Server wiring: loads config from the environment, builds the router, and serves.

use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use totpfactor::{build_router, config::Config, state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("totpfactor=info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_level(true))
        .init();

    let config = Config::from_env();
    let addr = config.bind_addr;
    tracing::info!(
        issuer = %config.issuer,
        max_attempts = config.max_attempts,
        attempt_window_secs = config.attempt_window.as_secs(),
        "configuration loaded"
    );

    let app = build_router(Arc::new(state::init_state(config)));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
