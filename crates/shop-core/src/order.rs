//! # Order Types
//!
//! Orders are immutable snapshots of a cart at checkout time; only the
//! status (and paid timestamp) changes afterwards.

use crate::cart::CartLine;
use crate::error::{ShopError, ShopResult};
use crate::product::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat sales tax applied to order subtotals, in percent
pub const TAX_PERCENT: i64 = 8;

/// Length of generated order ids
pub const ORDER_ID_LEN: usize = 12;

/// Order lifecycle status.
///
/// Intended flow is `pending → paid | failed`, `paid → shipped → delivered`,
/// and any status → `cancelled`. Only membership in this set is enforced;
/// admins may set any status from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Failed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Failed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a client-supplied status (trimmed, case-insensitive)
    pub fn parse(raw: &str) -> ShopResult<Self> {
        let wanted = raw.trim().to_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|s| s.as_str() == wanted)
            .ok_or_else(|| ShopError::validation("Invalid status"))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a mock payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Failure,
}

impl PaymentOutcome {
    /// Anything other than `"success"` counts as a failure
    pub fn from_label(label: Option<&str>) -> Self {
        match label.unwrap_or("success") {
            "success" => PaymentOutcome::Success,
            _ => PaymentOutcome::Failure,
        }
    }

    pub fn status(&self) -> OrderStatus {
        match self {
            PaymentOutcome::Success => OrderStatus::Paid,
            PaymentOutcome::Failure => OrderStatus::Failed,
        }
    }
}

/// Shipping details captured at checkout, independent of the live profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSnapshot {
    #[serde(default, rename = "shippingName")]
    pub name: Option<String>,
    #[serde(default, rename = "shippingEmail")]
    pub email: Option<String>,
    #[serde(default, rename = "shippingPhone")]
    pub phone: Option<String>,
    #[serde(default, rename = "shippingAddress")]
    pub address: Option<String>,
}

/// An order line, priced at checkout time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

impl OrderItem {
    pub fn from_cart_line(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line.total(),
        }
    }
}

/// A placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: i64,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub shipping: ShippingSnapshot,
}

impl Order {
    /// Snapshot a cart into a pending order.
    ///
    /// The total is computed from the prices on `lines`, which the store
    /// reads inside the same transaction that persists the order.
    pub fn from_cart(draft: &OrderDraft, lines: &[CartLine]) -> ShopResult<Self> {
        if lines.is_empty() {
            return Err(ShopError::EmptyCart);
        }
        let items: Vec<OrderItem> = lines.iter().map(OrderItem::from_cart_line).collect();
        let total = items.iter().map(|i| i.line_total).sum();

        Ok(Self {
            id: draft.id.clone(),
            user_id: draft.user_id,
            items,
            total,
            status: OrderStatus::Pending,
            created_at: draft.created_at,
            paid_at: None,
            shipping: draft.shipping.clone(),
        })
    }

    /// Σ unit price × quantity over the stored items
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(|i| i.unit_price * i.quantity).sum()
    }

    pub fn tax(&self) -> Price {
        self.subtotal().percent(TAX_PERCENT)
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Identity and shipping for an order about to be created
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub id: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub shipping: ShippingSnapshot,
}

impl OrderDraft {
    pub fn new(user_id: i64, shipping: ShippingSnapshot) -> Self {
        Self {
            id: new_order_id(),
            user_id,
            created_at: Utc::now(),
            shipping,
        }
    }
}

/// Short opaque order id: the first 12 hex digits of a v4 UUID
pub fn new_order_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ORDER_ID_LEN);
    id
}
