use crate::domain::model::Product;
use crate::domain::ports::CartStorage;
use crate::utils::error::Result;
use crate::utils::validation::validate_cart_lines;

pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Loads the stored cart under `key`. A missing key is an empty cart.
pub fn read_cart<S: CartStorage + ?Sized>(storage: &S, key: &str) -> Result<Vec<Product>> {
    let Some(raw) = storage.get_item(key)? else {
        tracing::debug!("No stored cart under key '{}', starting empty", key);
        return Ok(Vec::new());
    };

    let cart: Vec<Product> = serde_json::from_str(&raw)?;
    validate_cart_lines(&cart)?;

    tracing::debug!("Loaded {} cart lines from key '{}'", cart.len(), key);
    Ok(cart)
}

pub fn write_cart<S: CartStorage + ?Sized>(storage: &S, key: &str, cart: &[Product]) -> Result<()> {
    let raw = serde_json::to_string(cart)?;
    storage.set_item(key, &raw)?;

    tracing::debug!("Persisted {} cart lines ({} bytes) to key '{}'", cart.len(), raw.len(), key);
    Ok(())
}
