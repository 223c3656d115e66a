//! Up API client
//!
//! Thin REST bindings over the instrumented, bearer-authenticated HTTP client:
//! - Paginated account and webhook listings
//! - Single transaction lookup

use crate::domain::errors::{ApiError, ConfigError};
use crate::domain::ports::{PageRequest, UpApi};
use crate::domain::types::{Account, Page, Transaction, Webhook};
use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::up::schema::{
    AccountResource, GetTransactionResponse, ListResponse, WebhookResource,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

pub const UP_API_ADDRESS: &str = "https://api.up.com.au/api/v1";

pub struct UpClient {
    client: ClientWithMiddleware,
    base_url: Url,
}

impl UpClient {
    pub fn new(base_url: &str, bearer_token: &str, metrics: Metrics) -> Result<Self, ConfigError> {
        let client = HttpClientFactory::create_client(bearer_token, metrics)?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: ClientWithMiddleware, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Base that endpoint paths and relative cursors resolve against. Always ends in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn page_url(&self, collection: &str, request: PageRequest) -> Result<Url, ApiError> {
        match request {
            PageRequest::First { page_size } => {
                let mut url = self.endpoint(&[collection])?;
                url.query_pairs_mut()
                    .append_pair("page[size]", &page_size.to_string());
                Ok(url)
            }
            PageRequest::Cursor(url) => Ok(url),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let path = url.path().to_string();
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                path,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| ApiError::Decode {
            path,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl UpApi for UpClient {
    async fn list_accounts(&self, request: PageRequest) -> Result<Page<Account>, ApiError> {
        let url = self.page_url("accounts", request)?;
        let resp: ListResponse<AccountResource> = self.get_json(url).await?;
        Ok(resp.into_page())
    }

    async fn list_webhooks(&self, request: PageRequest) -> Result<Page<Webhook>, ApiError> {
        let url = self.page_url("webhooks", request)?;
        let resp: ListResponse<WebhookResource> = self.get_json(url).await?;
        Ok(resp.into_page())
    }

    async fn get_transaction(&self, id: &str) -> Result<Transaction, ApiError> {
        let url = self.endpoint(&["transactions", id])?;
        let resp: GetTransactionResponse = self.get_json(url).await?;
        Ok(resp.data.into())
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url, ConfigError> {
    let with_slash = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    let invalid = |source| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    };
    let url = Url::parse(&with_slash).map_err(invalid)?;
    if url.cannot_be_a_base() {
        return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    Ok(url)
}
