//! # Order Workflow
//!
//! Checkout, mock payment and admin status changes.
//!
//! ```text
//! create_order
//!   ├── store.create_order_from_cart   (one transaction: read cart,
//!   │                                   insert order + items, clear cart)
//!   └── notify confirmation            (after commit, bounded by a
//!                                       timeout, failures logged only)
//! ```

use crate::error::{ShopError, ShopResult};
use crate::notify::{BoxedNotifier, DeliveryReceipt, DeliveryStatus, NotifyError, OrderConfirmation};
use crate::order::{Order, OrderDraft, OrderStatus, PaymentOutcome, ShippingSnapshot};
use crate::shipping;
use crate::store::SharedStore;
use chrono::Utc;
use std::time::Duration;
use tracing::{info, instrument, warn};

pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

const ORDER_NOT_FOUND: &str = "Order not found";

/// Order lifecycle operations over a store and a notifier
#[derive(Clone)]
pub struct OrderWorkflow {
    store: SharedStore,
    notifier: BoxedNotifier,
    notify_timeout: Duration,
    tracking_url: Option<String>,
}

impl OrderWorkflow {
    pub fn new(store: SharedStore, notifier: BoxedNotifier) -> Self {
        Self {
            store,
            notifier,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
            tracking_url: None,
        }
    }

    /// Upper bound on a single notification send
    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    /// Order tracking page linked from status emails
    pub fn with_tracking_url(mut self, base: impl Into<String>) -> Self {
        self.tracking_url = Some(base.into());
        self
    }

    /// Turn the user's cart into a pending order, then send a confirmation.
    ///
    /// The confirmation never affects the result: once the order is
    /// committed this returns it, whatever happens to the email.
    #[instrument(skip(self, shipping))]
    pub async fn create_order(&self, user_id: i64, shipping: ShippingSnapshot) -> ShopResult<Order> {
        let draft = OrderDraft::new(user_id, shipping);
        let order = self.store.create_order_from_cart(draft).await?;

        info!(
            order_id = %order.id,
            total = %order.total.display(),
            items = order.items.len(),
            "Order created"
        );

        self.send_confirmation(&order).await;
        Ok(order)
    }

    /// Flip an owned order to paid or failed
    #[instrument(skip(self))]
    pub async fn record_mock_payment(
        &self,
        user_id: i64,
        order_id: &str,
        outcome: PaymentOutcome,
    ) -> ShopResult<Order> {
        let status = outcome.status();
        let paid_at = (outcome == PaymentOutcome::Success).then(Utc::now);

        let order = self
            .store
            .record_payment(user_id, order_id, status, paid_at)
            .await?
            .ok_or_else(|| ShopError::not_found(ORDER_NOT_FOUND))?;

        info!(order_id = %order.id, status = %order.status, "Mock payment recorded");
        Ok(order)
    }

    pub async fn list_orders(&self, user_id: i64) -> ShopResult<Vec<Order>> {
        self.store.orders_for_user(user_id).await
    }

    pub async fn list_all_orders(&self) -> ShopResult<Vec<Order>> {
        self.store.all_orders().await
    }

    /// Admin status change. Any status in the enumerated set may be set
    /// from any other; shipped and delivered also email the owner.
    #[instrument(skip(self))]
    pub async fn update_status(&self, order_id: &str, raw_status: &str) -> ShopResult<Order> {
        let status = OrderStatus::parse(raw_status)?;
        let order = self
            .store
            .update_order_status(order_id, status)
            .await?
            .ok_or_else(|| ShopError::not_found(ORDER_NOT_FOUND))?;

        info!(order_id = %order.id, status = %status, "Order status updated");

        if let Some(delivery) = DeliveryStatus::for_order_status(status) {
            self.send_status_update(&order, &delivery).await;
        }
        Ok(order)
    }

    async fn send_confirmation(&self, order: &Order) {
        let Some(recipient) = self.recipient(order).await else {
            return;
        };
        let confirmation = OrderConfirmation::for_order(order);
        let result = tokio::time::timeout(
            self.notify_timeout,
            self.notifier.send_order_confirmation(&confirmation, &recipient),
        )
        .await;

        self.log_delivery("order_confirmation", &order.id, flatten(result));
    }

    async fn send_status_update(&self, order: &Order, status: &DeliveryStatus) {
        let Some(recipient) = self.recipient(order).await else {
            return;
        };
        let tracking_url = self.tracking_link(&order.id);
        let result = tokio::time::timeout(
            self.notify_timeout,
            self.notifier
                .send_status_update(&order.id, &recipient, status, tracking_url.as_deref()),
        )
        .await;

        self.log_delivery("status_update", &order.id, flatten(result));
    }

    async fn recipient(&self, order: &Order) -> Option<String> {
        match self.store.find_user(order.user_id).await {
            Ok(Some(user)) => Some(user.email),
            Ok(None) => {
                let fallback = order
                    .shipping
                    .email
                    .as_deref()
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string);
                if fallback.is_none() {
                    warn!(order_id = %order.id, user_id = order.user_id, "No user or shipping email for order, skipping email");
                }
                fallback
            }
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Recipient lookup failed, skipping email");
                None
            }
        }
    }

    fn tracking_link(&self, order_id: &str) -> Option<String> {
        self.tracking_url
            .as_deref()
            .map(|base| shipping::tracking_link(base, order_id))
    }

    fn log_delivery(&self, kind: &str, order_id: &str, result: Result<DeliveryReceipt, NotifyError>) {
        match result {
            Ok(receipt) => info!(
                kind,
                order_id,
                provider = receipt.provider,
                message_id = receipt.message_id.as_deref().unwrap_or("-"),
                "Notification sent"
            ),
            Err(e) => warn!(
                kind,
                order_id,
                provider = self.notifier.provider_name(),
                error = %e,
                "Notification failed"
            ),
        }
    }
}

impl std::fmt::Debug for OrderWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderWorkflow")
            .field("notifier", &self.notifier.provider_name())
            .field("notify_timeout", &self.notify_timeout)
            .field("tracking_url", &self.tracking_url)
            .finish_non_exhaustive()
    }
}

fn flatten(
    result: Result<Result<DeliveryReceipt, NotifyError>, tokio::time::error::Elapsed>,
) -> Result<DeliveryReceipt, NotifyError> {
    result.unwrap_or(Err(NotifyError::Timeout))
}
