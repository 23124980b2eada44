pub mod cart;
pub mod manager;
pub mod persist;

pub use crate::domain::model::{Product, ProductId, Stock, UpdateProductAmount};
pub use crate::domain::ports::{CartStorage, CatalogApi, ConfigProvider, Notifier};
pub use crate::utils::error::Result;
