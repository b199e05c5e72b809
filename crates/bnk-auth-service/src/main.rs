//! # bnk-auth-service — Binary Entry Point
//!
//! Binds to `PORT` (default 8083). Requires `JWT_SECRET` (base64, at least
//! 32 bytes decoded); `JWT_TTL_SECS` sets the token lifetime (default 1800).

use std::net::SocketAddr;

use bnk_token::TokenConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8083);

    let tokens = TokenConfig::from_env().map_err(|e| {
        tracing::error!("Token configuration failed: {e}");
        e
    })?;
    tracing::info!(ttl_secs = tokens.ttl_secs, "token signing configured");

    let app = bnk_auth_service::app(bnk_auth_service::AppState::new(&tokens));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("bnk-auth-service listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().flatten_event(true))
            .init();
    } else {
        tracing_subscriber::registry().with(env_filter).with(fmt::layer()).init();
    }
}
