//! # Cart Types

use crate::error::{ShopError, ShopResult};
use crate::product::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cart row joined with the product's current price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart row id
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: u32,
    /// Current catalog price
    pub unit_price: Price,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// Subtotal of a set of cart lines
pub fn subtotal(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::total).sum()
}

/// Validate a requested quantity
pub fn validate_quantity(qty: i64) -> ShopResult<u32> {
    if qty < 1 {
        return Err(ShopError::validation("Quantity must be at least 1"));
    }
    u32::try_from(qty).map_err(|_| ShopError::validation("Quantity is too large"))
}
