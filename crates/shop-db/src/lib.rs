//! # shop-db
//!
//! PostgreSQL implementation of the spark-shop store traits.
//!
//! ## Tables
//!
//! - `users` - accounts, shipping profile, admin flag
//! - `products` - catalog, prices in cents
//! - `cart_items` - one row per (user, product)
//! - `orders` / `order_items` - immutable checkout snapshots
//! - `payment_methods` - saved cards, obfuscated number and CVV
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_db::{DbConfig, PgStore};
//!
//! let config = DbConfig::from_env()?.expect("DATABASE_URL");
//! let pool = shop_db::create_pool(&config).await?;
//! shop_db::migrate(&pool).await?;
//!
//! let store = Arc::new(PgStore::new(pool));
//! ```

pub mod carts;
pub mod catalog;
pub mod config;
pub mod orders;
pub mod payment_methods;
pub mod updates;
pub mod users;

pub use config::DbConfig;

use secrecy::ExposeSecret;
use shop_core::ShopError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Store over a PostgreSQL pool. Every trait method acquires one
/// connection (or one transaction) and releases it on return.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Create a connection pool with bounded acquisition
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(config.url.expose_secret())
        .await
}

/// Apply embedded migrations
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Log a database failure in full and hide it behind `Infrastructure`
pub(crate) fn db_error(context: &'static str, e: sqlx::Error) -> ShopError {
    tracing::error!(context, error = %e, "Database error");
    ShopError::infrastructure(format!("{}: {}", context, e))
}

/// Like [`db_error`], but a unique violation becomes `Conflict(message)`
pub(crate) fn conflict_or_db_error(context: &'static str, message: &str, e: sqlx::Error) -> ShopError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return ShopError::Conflict(message.to_string());
        }
    }
    db_error(context, e)
}

/// Upper bound for a stored quantity; merges saturate here
pub(crate) const MAX_QUANTITY: i64 = u32::MAX as i64;

/// Stored quantities are BIGINT checked to `1..=MAX_QUANTITY`
pub(crate) fn quantity_from_db(quantity: i64) -> Result<u32, ShopError> {
    u32::try_from(quantity)
        .map_err(|_| ShopError::infrastructure(format!("quantity out of range: {}", quantity)))
}
