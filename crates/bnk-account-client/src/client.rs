//! reqwest implementation of [`AccountDirectory`].

use async_trait::async_trait;
use bnk_core::{Account, AccountId, AccountPayload, BankId};
use reqwest::StatusCode;
use url::Url;

use crate::config::AccountStoreConfig;
use crate::directory::AccountDirectory;
use crate::error::AccountStoreError;

/// HTTP client for the account service.
#[derive(Debug, Clone)]
pub struct AccountStoreClient {
    http: reqwest::Client,
    base_url: Url,
    read_retries: u32,
}

impl AccountStoreClient {
    /// Build a client from configuration.
    pub fn new(config: AccountStoreConfig) -> Result<Self, AccountStoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| AccountStoreError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: config.base_url,
            read_retries: config.read_retries,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// Turn a non-2xx response into [`AccountStoreError::Api`].
async fn check(endpoint: &str, resp: reqwest::Response) -> Result<reqwest::Response, AccountStoreError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(AccountStoreError::Api {
        endpoint: endpoint.to_string(),
        status,
        body,
    })
}

fn transport(endpoint: &str) -> impl FnOnce(reqwest::Error) -> AccountStoreError + '_ {
    move |source| AccountStoreError::Http {
        endpoint: endpoint.to_string(),
        source,
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, AccountStoreError> {
    resp.json().await.map_err(|source| AccountStoreError::Deserialization {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[async_trait]
impl AccountDirectory for AccountStoreClient {
    async fn list_by_bank(&self, bank_id: BankId) -> Result<Vec<Account>, AccountStoreError> {
        let endpoint = format!("GET /accounts/bank/{bank_id}");
        let url = self.url(&format!("accounts/bank/{bank_id}"));

        let resp = crate::retry::retry_send(&endpoint, self.read_retries, || {
            self.http.get(&url).send()
        })
        .await
        .map_err(transport(&endpoint))?;

        // Older account services answer 404 for a bank with no accounts.
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let resp = check(&endpoint, resp).await?;
        decode(&endpoint, resp).await
    }

    async fn create(&self, payload: &AccountPayload) -> Result<Account, AccountStoreError> {
        let endpoint = "POST /accounts";
        let resp = self
            .http
            .post(self.url("accounts"))
            .json(payload)
            .send()
            .await
            .map_err(transport(endpoint))?;
        let resp = check(endpoint, resp).await?;
        decode(endpoint, resp).await
    }

    async fn update(
        &self,
        account_id: AccountId,
        payload: &AccountPayload,
    ) -> Result<Account, AccountStoreError> {
        let endpoint = format!("PUT /accounts/{account_id}");
        let resp = self
            .http
            .put(self.url(&format!("accounts/{account_id}")))
            .json(payload)
            .send()
            .await
            .map_err(transport(&endpoint))?;
        let resp = check(&endpoint, resp).await?;
        decode(&endpoint, resp).await
    }

    async fn delete(&self, account_id: AccountId) -> Result<(), AccountStoreError> {
        let endpoint = format!("DELETE /accounts/{account_id}");
        let resp = self
            .http
            .delete(self.url(&format!("accounts/{account_id}")))
            .send()
            .await
            .map_err(transport(&endpoint))?;
        check(&endpoint, resp).await?;
        Ok(())
    }

    async fn delete_by_bank(&self, bank_id: BankId) -> Result<(), AccountStoreError> {
        let endpoint = format!("DELETE /accounts/bank/{bank_id}");
        let resp = self
            .http
            .delete(self.url(&format!("accounts/bank/{bank_id}")))
            .send()
            .await
            .map_err(transport(&endpoint))?;
        check(&endpoint, resp).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AccountStoreError> {
        let endpoint = "GET /health/liveness";
        let resp = self
            .http
            .get(self.url("health/liveness"))
            .send()
            .await
            .map_err(transport(endpoint))?;
        check(endpoint, resp).await?;
        Ok(())
    }
}
