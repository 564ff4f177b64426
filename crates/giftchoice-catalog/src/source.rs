use std::time::Duration;

use async_trait::async_trait;
use giftchoice_core::Product;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

/// Where the catalog comes from
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn fetch_products(&self) -> Result<Vec<Product>>;
}

/// `GET {base_url}/products` on the storefront REST API
#[derive(Debug, Clone)]
pub struct HttpProductSource {
    base_url: String,
    client: Client,
}

impl HttpProductSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(CatalogError::Config("API base URL is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    pub fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let url = self.products_url();
        debug!("Fetching products from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let records: Vec<Value> = response.json().await?;
        Ok(decode_products(records))
    }
}

/// Decode product records one by one, skipping records that do not decode
fn decode_products(records: Vec<Value>) -> Vec<Product> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Product>(record) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!("Skipping product record {}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Fixed product list, for tests and offline use
#[derive(Debug, Clone, Default)]
pub struct StaticProductSource {
    products: Vec<Product>,
}

impl StaticProductSource {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductSource for StaticProductSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }
}
