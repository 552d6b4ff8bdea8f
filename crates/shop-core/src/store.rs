//! # Store Traits
//!
//! Persistence seams for spark-shop. `shop-db` implements them over
//! PostgreSQL; [`crate::memory::MemoryStore`] implements them in process.
//!
//! Every method that touches user-owned rows takes the caller's `user_id`
//! and scopes by it, so a row owned by someone else looks absent.

use crate::cart::CartLine;
use crate::error::ShopResult;
use crate::order::{Order, OrderDraft, OrderStatus};
use crate::payment_method::{NewPaymentMethod, PaymentMethod};
use crate::product::{CatalogEntry, Product};
use crate::updates::FieldUpdates;
use crate::user::{NewUser, User, UserCredentials};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const EMAIL_TAKEN: &str = "Email already registered";

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Duplicate email → `Conflict`.
    async fn create_user(&self, new_user: NewUser) -> ShopResult<User>;

    async fn find_user(&self, user_id: i64) -> ShopResult<Option<User>>;

    async fn find_credentials(&self, email: &str) -> ShopResult<Option<UserCredentials>>;

    /// Apply a partial update and return the updated profile, `None` if the
    /// user does not exist. Duplicate email → `Conflict`.
    async fn update_user(&self, user_id: i64, updates: &FieldUpdates) -> ShopResult<Option<User>>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All products ordered by name
    async fn list_products(&self) -> ShopResult<Vec<Product>>;

    async fn find_product(&self, product_id: i64) -> ShopResult<Option<Product>>;

    /// Insert or update a product keyed by name
    async fn upsert_product(&self, entry: &CatalogEntry) -> ShopResult<Product>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Cart rows joined with current product prices, newest first
    async fn cart_lines(&self, user_id: i64) -> ShopResult<Vec<CartLine>>;

    /// Add `quantity` of a product, merging into an existing line for the
    /// same product. Unknown product → `Validation`.
    async fn add_to_cart(&self, user_id: i64, product_id: i64, quantity: u32) -> ShopResult<()>;

    /// Returns `false` when the line is not the caller's
    async fn set_cart_quantity(&self, user_id: i64, item_id: i64, quantity: u32) -> ShopResult<bool>;

    /// Returns `false` when the line is not the caller's
    async fn remove_cart_item(&self, user_id: i64, item_id: i64) -> ShopResult<bool>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Snapshot the user's cart into an order and clear the cart as one
    /// atomic unit. Empty cart → `EmptyCart` with nothing persisted.
    async fn create_order_from_cart(&self, draft: OrderDraft) -> ShopResult<Order>;

    /// The user's orders, newest first
    async fn orders_for_user(&self, user_id: i64) -> ShopResult<Vec<Order>>;

    /// Every order, newest first
    async fn all_orders(&self) -> ShopResult<Vec<Order>>;

    /// Set the status of an order owned by `user_id`, optionally stamping
    /// the paid time. `None` when no such order is owned by the user.
    async fn record_payment(
        &self,
        user_id: i64,
        order_id: &str,
        status: OrderStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> ShopResult<Option<Order>>;

    /// Set the status of any order. `None` when the order does not exist.
    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ShopResult<Option<Order>>;
}

/// Saved cards. Implementations keep at most one default row per user:
/// when a write sets `is_default`, every other row of that user is cleared
/// in the same transaction.
#[async_trait]
pub trait PaymentMethodStore: Send + Sync {
    /// Default first, then newest first
    async fn list_payment_methods(&self, user_id: i64) -> ShopResult<Vec<PaymentMethod>>;

    async fn find_payment_method(&self, user_id: i64, id: i64) -> ShopResult<Option<PaymentMethod>>;

    async fn default_payment_method(&self, user_id: i64) -> ShopResult<Option<PaymentMethod>>;

    /// Returns the new row id
    async fn insert_payment_method(&self, user_id: i64, method: NewPaymentMethod) -> ShopResult<i64>;

    /// Returns `false` when the row is not the caller's
    async fn update_payment_method(&self, user_id: i64, id: i64, updates: &FieldUpdates) -> ShopResult<bool>;

    /// Returns `false` when the row is not the caller's
    async fn delete_payment_method(&self, user_id: i64, id: i64) -> ShopResult<bool>;

    /// Returns `false` when the row is not the caller's
    async fn set_default_payment_method(&self, user_id: i64, id: i64) -> ShopResult<bool>;
}

/// Everything the service needs from storage
pub trait ShopStore: UserStore + CatalogStore + CartStore + OrderStore + PaymentMethodStore {}

impl<T> ShopStore for T where T: UserStore + CatalogStore + CartStore + OrderStore + PaymentMethodStore {}

/// Type alias for a shared store (dynamic dispatch)
pub type SharedStore = Arc<dyn ShopStore>;
