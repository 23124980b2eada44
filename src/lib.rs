pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CartCommand, CliConfig};

pub use adapters::{HttpCatalog, JsonFileStorage, MemoryStorage, NoticeBoard, TracingNotifier};
pub use config::TomlConfig;
pub use crate::core::manager::CartManager;
pub use domain::model::{CartSummary, Notice, Product, ProductId, Stock, UpdateProductAmount};
pub use utils::error::{CartError, Result};
