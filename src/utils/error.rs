use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Requested amount {requested} of product {product_id} exceeds available stock {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    #[error("Product {product_id} is not in the cart")]
    ProductNotInCart { product_id: ProductId },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Stock,
    NotFound,
    Network,
    Storage,
    Configuration,
    Validation,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::StockExceeded { .. } => ErrorCategory::Stock,
            CartError::ProductNotInCart { .. } => ErrorCategory::NotFound,
            CartError::ApiError(_) => ErrorCategory::Network,
            CartError::IoError(_) | CartError::SerializationError(_) => ErrorCategory::Storage,
            CartError::ConfigError { .. } | CartError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            CartError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn is_stock_exceeded(&self) -> bool {
        matches!(self, CartError::StockExceeded { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::StockExceeded { .. } => "Requested quantity is out of stock".to_string(),
            CartError::ProductNotInCart { product_id } => {
                format!("Product {} is not in your cart", product_id)
            }
            CartError::ApiError(_) => "The store service could not be reached".to_string(),
            CartError::IoError(_) | CartError::SerializationError(_) => {
                "The saved cart could not be read or written".to_string()
            }
            CartError::ConfigError { message } => format!("Configuration problem: {}", message),
            CartError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting {}: {}", field, reason)
            }
            CartError::ValidationError { message } => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
