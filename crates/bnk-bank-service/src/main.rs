//! # bnk-bank-service — Binary Entry Point
//!
//! Binds to `PORT` (default 8081). See [`BankServiceConfig::from_env`] for
//! the rest of the environment. `RUST_LOG` sets the filter;
//! `LOG_FORMAT=json` switches to JSON lines.

use std::net::SocketAddr;

use bnk_bank_service::config::BankServiceConfig;
use bnk_bank_service::{AppState, BankStore, Coordinator};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = BankServiceConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;
    tracing::debug!(?config, "configuration loaded");

    // Initialize database pool (optional; absent means in-memory only).
    let pool = bnk_bank_service::db::init_pool(config.database_url.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Database initialization failed: {e}");
            e
        })?;

    let banks = BankStore::with_pool(pool);
    let loaded = banks.hydrate().await.map_err(|e| {
        tracing::error!("Database hydration failed: {e}");
        e
    })?;
    if loaded > 0 {
        tracing::info!(banks = loaded, "bank store hydrated");
    }

    tracing::info!(
        url = %config.accounts.base_url,
        call_timeout_ms = config.accounts.read_budget().as_millis() as u64,
        "account service client configured"
    );
    let coordinator = Coordinator::connect(banks.clone(), config.accounts)?;

    let app = bnk_bank_service::app(AppState::new(banks, coordinator));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("bnk-bank-service listening on {addr}");

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
