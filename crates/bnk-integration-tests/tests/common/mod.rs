//! Shared harness: every service on its own loopback listener, wired the
//! way the binaries wire them.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use argon2::Params;
use axum::Router;
use base64::Engine as _;
use bnk_account_client::{AccountStoreClient, AccountStoreConfig};
use bnk_auth_service::password::PasswordHasher;
use bnk_bank_service::{AppState as BankState, BankStore, Coordinator};
use bnk_gateway::config::{GatewayConfig, UpstreamUrls};
use bnk_gateway::GatewayState;
use bnk_token::TokenConfig;
use tokio::net::TcpListener;
use url::Url;

/// Serve `app` on an ephemeral loopback port.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn base_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}")).unwrap()
}

pub fn token_config() -> TokenConfig {
    let secret = base64::engine::general_purpose::STANDARD.encode([11u8; 32]);
    TokenConfig::from_lookup(|key| (key == "JWT_SECRET").then(|| secret.clone())).unwrap()
}

/// Start a bank service whose account client points at `accounts`.
pub async fn spawn_bank_service(accounts: Url) -> (SocketAddr, BankStore) {
    let mut config = AccountStoreConfig::new(accounts.as_str()).unwrap();
    config.timeout = Duration::from_secs(2);
    let client = AccountStoreClient::new(config).unwrap();
    let banks = BankStore::new();
    let coordinator = Coordinator::new(banks.clone(), Arc::new(client), Duration::from_secs(2));
    let addr = spawn(bnk_bank_service::app(BankState::new(banks.clone(), coordinator))).await;
    (addr, banks)
}

/// The whole stack behind one gateway.
pub struct Stack {
    pub gateway: Url,
    pub banks: BankStore,
    pub http: reqwest::Client,
}

impl Stack {
    pub async fn start() -> Self {
        let tokens = token_config();

        let accounts = spawn(bnk_account_service::app(
            bnk_account_service::AccountStore::new(),
        ))
        .await;
        let (bank, banks) = spawn_bank_service(base_url(accounts)).await;

        let mut auth_state = bnk_auth_service::AppState::new(&tokens);
        auth_state.hasher =
            PasswordHasher::with_params(Params::new(Params::MIN_M_COST, 1, 1, None).unwrap());
        let auth = spawn(bnk_auth_service::app(auth_state)).await;

        let config = GatewayConfig {
            port: 0,
            tokens,
            upstreams: UpstreamUrls {
                bank: base_url(bank),
                accounts: base_url(accounts),
                auth: base_url(auth),
            },
            upstream_timeout: Duration::from_secs(5),
        };
        let gateway = spawn(bnk_gateway::app(GatewayState::from_config(&config).unwrap())).await;

        Self {
            gateway: base_url(gateway),
            banks,
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.gateway.as_str().trim_end_matches('/'), path)
    }

    /// Register `name` and return a bearer header value for it.
    pub async fn login(&self, name: &str) -> String {
        let password = "wonder1and";
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({
                "name": name,
                "email": format!("{name}@example.com"),
                "password": password,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "register {name}");

        let token = self
            .http
            .post(self.url("/auth/token"))
            .json(&serde_json::json!({"username": name, "password": password}))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        format!("Bearer {token}")
    }
}
