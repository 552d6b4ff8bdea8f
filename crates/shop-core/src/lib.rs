//! # shop-core
//!
//! Core types, traits and workflows for the spark-shop backend.
//!
//! This crate provides:
//! - `ShopError` for typed error handling
//! - `User`, `Product`, `CartLine`, `Order` and `PaymentMethod` domain types
//! - Store traits (`UserStore`, `CartStore`, `OrderStore`, ...) and an
//!   in-process `MemoryStore`
//! - `Notifier` trait for transactional email providers
//! - `OrderWorkflow` (checkout, mock payment, status changes)
//! - `PaymentMethodService` (saved cards with masking and a single default)
//! - `TokenIssuer` and password digests for identity
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{MemoryStore, OrderWorkflow, ShippingSnapshot};
//!
//! let store = Arc::new(MemoryStore::new());
//! let workflow = OrderWorkflow::new(store, notifier)
//!     .with_notify_timeout(Duration::from_secs(5));
//!
//! // Cart → order, cart cleared, confirmation emailed
//! let order = workflow.create_order(user_id, ShippingSnapshot::default()).await?;
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod crypto;
pub mod error;
pub mod memory;
pub mod notify;
pub mod order;
pub mod payment_method;
pub mod product;
pub mod shipping;
pub mod store;
pub mod updates;
pub mod user;
pub mod wallet;

// Re-exports for convenience
pub use auth::{Claims, TokenError, TokenIssuer};
pub use cart::CartLine;
pub use checkout::OrderWorkflow;
pub use crypto::{ObfuscationKey, RevealError};
pub use error::{ShopError, ShopResult};
pub use memory::MemoryStore;
pub use notify::{
    BoxedNotifier, DeliveryReceipt, DeliveryStatus, Notifier, NotifyError, OrderConfirmation,
    StatusBanner,
};
pub use order::{Order, OrderDraft, OrderItem, OrderStatus, PaymentOutcome, ShippingSnapshot};
pub use payment_method::{
    DefaultPaymentMethod, MaskedPaymentMethod, NewPaymentMethod, PaymentMethod,
    PaymentMethodPatch, PaymentMethodRequest, PaymentMethodSummary,
};
pub use product::{CatalogEntry, Price, Product, ProductCatalog};
pub use store::{
    CartStore, CatalogStore, OrderStore, PaymentMethodStore, SharedStore, ShopStore, UserStore,
};
pub use updates::{FieldUpdates, FieldValue};
pub use user::{AccountUpdate, Login, NewUser, Registration, User, UserCredentials};
pub use wallet::PaymentMethodService;
