//! # Forwarding Proxy
//!
//! Relays a request to one upstream service and relays the answer back.
//! Method, path, query, body and end-to-end headers go through as they
//! came in (including `Authorization`); hop-by-hop headers are dropped in
//! both directions. Upstream status codes and bodies, error or not, are
//! returned unchanged. Only a failure to get any answer becomes a gateway
//! error.

use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};

use crate::config::UpstreamUrls;
use crate::error::GatewayError;
use crate::metrics::ApiMetrics;

/// Largest request body the gateway will buffer.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Connection-scoped headers (RFC 9110 §7.6.1) plus `Host`, which the
/// client derives from the upstream URL.
static HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::HOST,
];

/// Upstream route families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Bank,
    Accounts,
    Auth,
}

impl Upstream {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bank => "bank-service",
            Self::Accounts => "account-service",
            Self::Auth => "auth-service",
        }
    }
}

/// HTTP client plus upstream addresses.
#[derive(Debug, Clone)]
pub struct Proxy {
    http: reqwest::Client,
    urls: UpstreamUrls,
}

impl Proxy {
    /// Build a proxy whose every forwarded request is bounded by `timeout`.
    pub fn new(urls: UpstreamUrls, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { http, urls })
    }

    /// Full upstream URL for an inbound request URI.
    pub fn target(&self, upstream: Upstream, uri: &Uri) -> String {
        let base = match upstream {
            Upstream::Bank => &self.urls.bank,
            Upstream::Accounts => &self.urls.accounts,
            Upstream::Auth => &self.urls.auth,
        };
        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
        format!("{}{}", base.as_str().trim_end_matches('/'), path_and_query)
    }

    /// Send `request` to `upstream` and return its response.
    pub async fn forward(&self, upstream: Upstream, request: Request) -> Result<Response, GatewayError> {
        let (parts, body) = request.into_parts();
        let target = self.target(upstream, &parts.uri);
        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| GatewayError::BadRequest(format!("Could not read request body: {e}")))?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);

        tracing::debug!(upstream = upstream.name(), method = %parts.method, %target, "forwarding");
        let answer = self
            .http
            .request(parts.method, &target)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let detail = format!("{} {target}: {e}", upstream.name());
                if e.is_timeout() {
                    GatewayError::UpstreamTimeout(detail)
                } else {
                    GatewayError::UpstreamUnavailable(detail)
                }
            })?;

        let status = answer.status();
        let mut headers = answer.headers().clone();
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);
        let bytes = answer.bytes().await.map_err(|e| {
            GatewayError::UpstreamUnavailable(format!("{} {target}: {e}", upstream.name()))
        })?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Headers named in `Connection` are hop-by-hop too.
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in named.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

async fn relay(proxy: &Proxy, upstream: Upstream, request: Request) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    match proxy.forward(upstream, request).await {
        Ok(response) => response,
        Err(err) => {
            if matches!(
                err,
                GatewayError::UpstreamUnavailable(_) | GatewayError::UpstreamTimeout(_)
            ) {
                if let Some(m) = metrics {
                    m.record_upstream_failure();
                }
            }
            err.into_response()
        }
    }
}

/// `/bank/**` to the bank service.
pub async fn to_bank(State(proxy): State<Proxy>, request: Request) -> Response {
    relay(&proxy, Upstream::Bank, request).await
}

/// `/accounts/**` to the account service.
pub async fn to_accounts(State(proxy): State<Proxy>, request: Request) -> Response {
    relay(&proxy, Upstream::Accounts, request).await
}

/// `/auth/**` to the auth service.
pub async fn to_auth(State(proxy): State<Proxy>, request: Request) -> Response {
    relay(&proxy, Upstream::Auth, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use url::Url;

    fn proxy(bank: &str) -> Proxy {
        Proxy::new(
            UpstreamUrls {
                bank: Url::parse(bank).unwrap(),
                accounts: Url::parse("http://accounts.internal:8082").unwrap(),
                auth: Url::parse("http://auth.internal:8083").unwrap(),
            },
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn target_keeps_path_and_query() {
        let p = proxy("http://bank.internal:8081/");
        let uri: Uri = "/bank/3/accounts?sort=id".parse().unwrap();
        assert_eq!(
            p.target(Upstream::Bank, &uri),
            "http://bank.internal:8081/bank/3/accounts?sort=id"
        );
        let uri: Uri = "/accounts/bank/3".parse().unwrap();
        assert_eq!(
            p.target(Upstream::Accounts, &uri),
            "http://accounts.internal:8082/accounts/bank/3"
        );
    }

    #[test]
    fn strips_hop_by_hop_and_connection_named_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace-hop"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-trace-hop", HeaderValue::from_static("1"));
        headers.insert(header::HOST, HeaderValue::from_static("gateway:8080"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        strip_hop_by_hop(&mut headers);

        assert_eq!(headers.len(), 2);
        assert!(headers.contains_key(header::AUTHORIZATION));
        assert!(headers.contains_key(header::CONTENT_TYPE));
    }
}
