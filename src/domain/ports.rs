use crate::domain::model::{CatalogProduct, Notice, ProductId, Stock};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable key-value storage with browser `localStorage` semantics.
pub trait CartStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn storage_key(&self) -> &str;
    fn request_timeout_secs(&self) -> Option<u64>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock>;
    async fn fetch_product(&self, product_id: ProductId) -> Result<CatalogProduct>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
