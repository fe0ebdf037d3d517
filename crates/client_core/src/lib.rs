use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::Product, error::CatalogError, protocol::decode_catalog};
use tracing::debug;
use url::Url;

pub mod cancel;
pub mod load;
pub mod state;
pub mod store;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use load::{LoadController, LoadTicket};
pub use state::{AppState, AppStatePatch, LoadPhase};
pub use store::{Merge, Store, Subscription};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Anything that can produce the product list.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self, signal: CancelSignal) -> Result<Vec<Product>, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    endpoint: Url,
}

impl CatalogClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid catalog endpoint '{endpoint}'"))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Downloads a product image as raw bytes.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn request_catalog(&self) -> Result<Vec<Product>, CatalogError> {
        debug!(endpoint = %self.endpoint, "requesting catalog");
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?;
        decode_catalog(&body)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_catalog(&self, mut signal: CancelSignal) -> Result<Vec<Product>, CatalogError> {
        if signal.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }

        tokio::select! {
            _ = signal.cancelled() => Err(CatalogError::Cancelled),
            result = self.request_catalog() => result,
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
