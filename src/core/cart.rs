//! Pure cart mutations. Every function takes the current lines and returns a
//! new list (or an error) without touching storage or the network.

use crate::domain::model::{
    CartOperation, CartSummary, CatalogProduct, Notice, Product, ProductId, Stock,
};
use crate::utils::error::{CartError, Result};
use chrono::Utc;

pub fn find_line(cart: &[Product], product_id: ProductId) -> Option<&Product> {
    cart.iter().find(|product| product.id == product_id)
}

pub fn current_amount(cart: &[Product], product_id: ProductId) -> u32 {
    find_line(cart, product_id).map_or(0, |product| product.amount)
}

/// Rejects `requested` when it is more than the stock has on hand.
pub fn ensure_in_stock(product_id: ProductId, requested: u64, stock: &Stock) -> Result<u32> {
    if requested > u64::from(stock.amount) {
        return Err(CartError::StockExceeded {
            product_id,
            requested,
            available: stock.amount,
        });
    }

    u32::try_from(requested).map_err(|_| CartError::StockExceeded {
        product_id,
        requested,
        available: stock.amount,
    })
}

pub fn with_amount(cart: &[Product], product_id: ProductId, amount: u32) -> Result<Vec<Product>> {
    if find_line(cart, product_id).is_none() {
        return Err(CartError::ProductNotInCart { product_id });
    }

    Ok(cart
        .iter()
        .map(|product| {
            if product.id == product_id {
                Product {
                    amount,
                    ..product.clone()
                }
            } else {
                product.clone()
            }
        })
        .collect())
}

pub fn with_new_line(cart: &[Product], record: CatalogProduct) -> Vec<Product> {
    let mut updated = cart.to_vec();
    updated.push(Product::from_catalog(record, 1));
    updated
}

pub fn without(cart: &[Product], product_id: ProductId) -> Result<Vec<Product>> {
    let index = cart
        .iter()
        .position(|product| product.id == product_id)
        .ok_or(CartError::ProductNotInCart { product_id })?;

    let mut updated = cart.to_vec();
    updated.remove(index);
    Ok(updated)
}

pub fn summarize(cart: &[Product]) -> CartSummary {
    CartSummary {
        distinct_items: cart.len(),
        total_units: cart.iter().map(|product| u64::from(product.amount)).sum(),
        total_price: cart.iter().map(Product::subtotal).sum(),
    }
}

pub fn failure_notice(operation: CartOperation, product_id: ProductId, error: &CartError) -> Notice {
    let message = if error.is_stock_exceeded() {
        error.user_friendly_message()
    } else {
        operation.failure_message().to_string()
    };

    Notice {
        operation,
        product_id,
        message,
        raised_at: Utc::now(),
    }
}
