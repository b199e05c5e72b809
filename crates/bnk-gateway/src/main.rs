//! # bnk-gateway — Binary Entry Point
//!
//! See [`GatewayConfig`](bnk_gateway::config::GatewayConfig) for the
//! environment. `RUST_LOG` sets the filter; `LOG_FORMAT=json` switches to
//! JSON lines.

use std::net::SocketAddr;

use bnk_gateway::config::GatewayConfig;
use bnk_gateway::GatewayState;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = GatewayConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;
    tracing::info!(
        bank = %config.upstreams.bank,
        accounts = %config.upstreams.accounts,
        auth = %config.upstreams.auth,
        timeout_ms = config.upstream_timeout.as_millis() as u64,
        "upstreams configured"
    );

    let app = bnk_gateway::app(GatewayState::from_config(&config)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("bnk-gateway listening on {addr}");

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
