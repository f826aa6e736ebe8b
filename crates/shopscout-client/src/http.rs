//! reqwest implementation of `CatalogBackend`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use shopscout_core::config::ApiConfig;
use shopscout_core::types::Product;

use crate::backend::CatalogBackend;
use crate::error::ClientError;
use crate::types::{ChatReply, ChatRequest, SearchRequest};

const SEARCH_ENDPOINT: &str = "/search";
const CHAT_ENDPOINT: &str = "/chat";

/// Talks JSON over HTTP to the catalog backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    search_url: Url,
    chat_url: Url,
}

impl HttpBackend {
    /// Build a backend rooted at `base_url`. Trailing slashes are ignored.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = base_url.trim().trim_end_matches('/');
        let join = |endpoint: &str| {
            Url::parse(&format!("{}{}", base, endpoint))
                .map_err(|e| ClientError::InvalidBaseUrl(format!("{} ({})", base_url, e)))
        };
        let search_url = join(SEARCH_ENDPOINT)?;
        let chat_url = join(CHAT_ENDPOINT)?;
        if !matches!(search_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = ClientBuilder::new().timeout(timeout).build()?;

        Ok(Self {
            client,
            search_url,
            chat_url,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    async fn post_json<B, R>(
        &self,
        endpoint: &'static str,
        url: &Url,
        body: &B,
    ) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self.client.post(url.clone()).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!(endpoint, bytes = bytes.len(), "Backend responded");
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogBackend for HttpBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Product>, ClientError> {
        self.post_json(SEARCH_ENDPOINT, &self.search_url, request)
            .await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.post_json(CHAT_ENDPOINT, &self.chat_url, request).await
    }
}
