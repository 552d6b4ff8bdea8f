//! # Notification Dispatcher
//!
//! The contract the order workflow uses to send transactional email.
//! Implementations live in `shop-mail`; the workflow only sees [`Notifier`].
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               Notifier (trait)               │
//! │  ├── send_order_confirmation()               │
//! │  ├── send_status_update()                    │
//! │  └── provider_name()                         │
//! └──────────────────────────────────────────────┘
//!                       ▲
//!          ┌────────────┴────────────┐
//!  ┌───────┴────────┐        ┌───────┴───────┐
//!  │SendGridNotifier│        │  LogNotifier  │
//!  └────────────────┘        └───────────────┘
//! ```

use crate::order::{Order, OrderStatus};
use crate::product::Price;
use crate::shipping;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_CARRIER: &str = "USPS";
pub const ADDRESS_NOT_PROVIDED: &str = "Address not provided";

/// Dispatcher failures. Logged by callers, never surfaced to clients.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Mail transport error: {0}")]
    Transport(String),

    #[error("Mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Mail configuration error: {0}")]
    Config(String),

    #[error("Email rendering failed: {0}")]
    Render(String),

    #[error("Notification timed out")]
    Timeout,
}

/// Acknowledgement from a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub provider: &'static str,
    pub message_id: Option<String>,
}

/// Shipment milestones that have a status email
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Shipped,
    OutForDelivery,
    Delivered,
    Other(String),
}

/// Icon, headline and accent color for a status email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBanner {
    pub icon: &'static str,
    pub title: &'static str,
    pub message: &'static str,
    pub color: &'static str,
}

impl DeliveryStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "shipped" => DeliveryStatus::Shipped,
            "out_for_delivery" => DeliveryStatus::OutForDelivery,
            "delivered" => DeliveryStatus::Delivered,
            other => DeliveryStatus::Other(other.to_string()),
        }
    }

    /// The milestone an order status change should announce, if any
    pub fn for_order_status(status: OrderStatus) -> Option<Self> {
        match status {
            OrderStatus::Shipped => Some(DeliveryStatus::Shipped),
            OrderStatus::Delivered => Some(DeliveryStatus::Delivered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeliveryStatus::Shipped => "shipped",
            DeliveryStatus::OutForDelivery => "out_for_delivery",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Other(raw) => raw,
        }
    }

    pub fn banner(&self) -> StatusBanner {
        match self {
            DeliveryStatus::Shipped => StatusBanner {
                icon: "📦",
                title: "Your Order Has Shipped!",
                message: "Your order is on its way!",
                color: "#3498db",
            },
            DeliveryStatus::OutForDelivery => StatusBanner {
                icon: "🚚",
                title: "Out for Delivery!",
                message: "Your order is arriving today!",
                color: "#f39c12",
            },
            DeliveryStatus::Delivered => StatusBanner {
                icon: "✅",
                title: "Order Delivered!",
                message: "Your order has arrived!",
                color: "#27ae60",
            },
            DeliveryStatus::Other(_) => StatusBanner {
                icon: "📬",
                title: "Order Update",
                message: "Status updated",
                color: "#95a5a6",
            },
        }
    }
}

/// One line of a confirmation email
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmationItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Everything a confirmation email shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub ordered_at: DateTime<Utc>,
    pub items: Vec<ConfirmationItem>,
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
    pub shipping_name: String,
    pub shipping_address: String,
    pub estimated_delivery: NaiveDate,
    pub carrier: &'static str,
    pub tracking_number: String,
}

impl OrderConfirmation {
    /// Build the payload for a freshly created order, filling shipping
    /// defaults and generating a tracking number
    pub fn for_order(order: &Order) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| ConfirmationItem {
                name: item.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.unit_price * item.quantity,
            })
            .collect();

        let shipping_name = order
            .shipping
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Customer {}", order.user_id));
        let shipping_address = order
            .shipping
            .address
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| ADDRESS_NOT_PROVIDED.to_string());

        Self {
            order_id: order.id.clone(),
            ordered_at: order.created_at,
            items,
            subtotal: order.subtotal(),
            tax: order.tax(),
            total: order.total,
            shipping_name,
            shipping_address,
            estimated_delivery: shipping::estimated_delivery(order.created_at),
            carrier: DEFAULT_CARRIER,
            tracking_number: shipping::tracking_number(),
        }
    }
}

/// Sends transactional email for orders
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_order_confirmation(
        &self,
        confirmation: &OrderConfirmation,
        recipient: &str,
    ) -> Result<DeliveryReceipt, NotifyError>;

    async fn send_status_update(
        &self,
        order_id: &str,
        recipient: &str,
        status: &DeliveryStatus,
        tracking_url: Option<&str>,
    ) -> Result<DeliveryReceipt, NotifyError>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared notifier (dynamic dispatch)
pub type BoxedNotifier = Arc<dyn Notifier>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::order::{OrderDraft, ShippingSnapshot};

    fn order(shipping: ShippingSnapshot) -> Order {
        let lines = vec![
            CartLine {
                id: 1,
                product_id: 10,
                product_name: "Lamp".into(),
                quantity: 2,
                unit_price: Price::from_cents(2500),
                added_at: Utc::now(),
            },
            CartLine {
                id: 2,
                product_id: 11,
                product_name: "Bulb".into(),
                quantity: 1,
                unit_price: Price::from_cents(499),
                added_at: Utc::now(),
            },
        ];
        Order::from_cart(&OrderDraft::new(77, shipping), &lines).unwrap()
    }

    #[test]
    fn test_banners() {
        assert_eq!(DeliveryStatus::parse("shipped").banner().color, "#3498db");
        assert_eq!(DeliveryStatus::parse("out_for_delivery").banner().icon, "🚚");
        assert_eq!(DeliveryStatus::parse("delivered").banner().title, "Order Delivered!");

        let unknown = DeliveryStatus::parse("lost_at_sea");
        assert_eq!(unknown.banner().title, "Order Update");
        assert_eq!(unknown.banner().color, "#95a5a6");
        assert_eq!(unknown.as_str(), "lost_at_sea");
    }

    #[test]
    fn test_for_order_status() {
        assert_eq!(
            DeliveryStatus::for_order_status(OrderStatus::Shipped),
            Some(DeliveryStatus::Shipped)
        );
        assert_eq!(
            DeliveryStatus::for_order_status(OrderStatus::Delivered),
            Some(DeliveryStatus::Delivered)
        );
        assert_eq!(DeliveryStatus::for_order_status(OrderStatus::Paid), None);
    }

    #[test]
    fn test_confirmation_defaults() {
        let confirmation = OrderConfirmation::for_order(&order(ShippingSnapshot::default()));

        assert_eq!(confirmation.shipping_name, "Customer 77");
        assert_eq!(confirmation.shipping_address, ADDRESS_NOT_PROVIDED);
        assert_eq!(confirmation.carrier, "USPS");
        assert_eq!(confirmation.tracking_number.len(), shipping::TRACKING_NUMBER_LEN);
    }

    #[test]
    fn test_confirmation_amounts() {
        let shipping = ShippingSnapshot {
            name: Some("Ada Lovelace".into()),
            address: Some("12 Analytical Row".into()),
            ..Default::default()
        };
        let confirmation = OrderConfirmation::for_order(&order(shipping));

        assert_eq!(confirmation.shipping_name, "Ada Lovelace");
        assert_eq!(confirmation.items.len(), 2);
        assert_eq!(confirmation.items[0].line_total.cents(), 5000);
        assert_eq!(confirmation.subtotal.cents(), 5499);
        assert_eq!(confirmation.tax.cents(), 440);
        assert_eq!(confirmation.total.cents(), 5499);
    }
}
