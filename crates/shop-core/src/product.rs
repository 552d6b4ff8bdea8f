//! # Product Types
//!
//! Catalog types for spark-shop. The catalog is read-only to the order
//! workflow; products can be seeded from `config/products.toml`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Amount of money in cents (USD). Serialized as decimal dollars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "f64", from = "f64")]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Create a price from a decimal dollar amount
    pub fn new(amount: f64) -> Self {
        Price((amount * 100.0).round() as i64)
    }

    /// Create a price from cents
    pub fn from_cents(cents: i64) -> Self {
        Price(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Percentage of this amount, rounded half away from zero to the cent
    pub fn percent(&self, pct: i64) -> Price {
        let scaled = self.0 * pct;
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        Price(rounded)
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        format!("${:.2}", self.as_decimal())
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> f64 {
        price.as_decimal()
    }
}

impl From<f64> for Price {
    fn from(amount: f64) -> Price {
        Price::new(amount)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Price;

    fn mul(self, qty: u32) -> Price {
        Price(self.0 * i64::from(qty))
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, |acc, p| acc + p)
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Catalog entry as written in the seed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Decimal dollars
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CatalogEntry {
    pub fn price(&self) -> Price {
        Price::new(self.price)
    }
}

/// Product seed catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<CatalogEntry>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
