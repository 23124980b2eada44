use crate::domain::model::{CatalogProduct, ProductId, Stock};
use crate::domain::ports::{CatalogApi, ConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Catalog backed by the storefront REST API (`/stock/{id}`, `/products/{id}`).
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    client: Client,
}

impl HttpCatalog {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(base_url, None)
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::build(config.api_base_url(), config.request_timeout_secs())
    }

    fn build(base_url: &str, timeout_secs: Option<u64>) -> Result<Self> {
        validate_url("api_base_url", base_url)?;

        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let body = response.error_for_status()?.json::<T>().await?;
        Ok(body)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock> {
        self.get_json(&format!("stock/{}", product_id)).await
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<CatalogProduct> {
        self.get_json(&format!("products/{}", product_id)).await
    }
}
