use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type ProductId = u64;

/// A cart line: the product's display fields plus the quantity in the cart.
///
/// Fields the cart does not know about are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub amount: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn from_catalog(record: CatalogProduct, amount: u32) -> Self {
        let mut extra = record.extra;
        // The cart owns `amount`; a catalog value would serialize twice.
        extra.remove("amount");

        Self {
            id: record.id,
            title: record.title,
            price: record.price,
            image: record.image,
            amount,
            extra,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.amount)
    }
}

/// Product record as served by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Units available for a product, as served by `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartSummary {
    pub distinct_items: usize,
    pub total_units: u64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            CartOperation::Add => "Failed to add product",
            CartOperation::Remove => "Failed to remove product",
            CartOperation::UpdateAmount => "Failed to update product quantity",
        }
    }
}

/// Transient, user-facing message raised when a cart operation fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub operation: CartOperation,
    pub product_id: ProductId,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}
