//! Checkout, order history and mock payments

use super::optional_body;
use crate::error::{ApiJson, ApiResult};
use crate::extract::AuthUser;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_core::{Order, OrderItem, OrderStatus, PaymentOutcome, Price, ShippingSnapshot};
use tracing::instrument;

/// Order line as returned right after checkout or payment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub product_id: i64,
    pub qty: u32,
    pub price: Price,
}

impl From<&OrderItem> for LineView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            qty: item.quantity,
            price: item.unit_price,
        }
    }
}

/// Order line in history listings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedLineView {
    pub product_id: i64,
    pub product_name: String,
    pub qty: u32,
    pub price: Price,
}

impl From<&OrderItem> for NamedLineView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            qty: item.quantity,
            price: item.unit_price,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrderView {
    pub id: String,
    pub user_id: i64,
    pub items: Vec<LineView>,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for CreatedOrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            user_id: order.user_id,
            items: order.items.iter().map(LineView::from).collect(),
            total: order.total,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// Order history entry. `userId` is only present in the admin listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub total: Price,
    pub subtotal: Price,
    pub tax: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub shipping: ShippingSnapshot,
    pub items: Vec<NamedLineView>,
}

impl OrderView {
    pub fn for_owner(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            user_id: None,
            total: order.total,
            subtotal: order.subtotal(),
            tax: order.tax(),
            status: order.status,
            created_at: order.created_at,
            paid_at: order.paid_at,
            shipping: order.shipping.clone(),
            items: order.items.iter().map(NamedLineView::from).collect(),
        }
    }

    pub fn for_admin(order: &Order) -> Self {
        Self {
            user_id: Some(order.user_id),
            ..Self::for_owner(order)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub id: String,
    pub status: OrderStatus,
    pub total: Price,
    pub items: Vec<LineView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockPaymentRequest {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
}

/// Turn the cart into a pending order
///
/// The body is optional; when present it may carry `shippingName`,
/// `shippingEmail`, `shippingPhone` and `shippingAddress`.
#[instrument(skip(state, body))]
pub async fn create_order(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CreatedOrderView>)> {
    let shipping: ShippingSnapshot = optional_body(&body)?;
    let order = state.orders.create_order(user_id, shipping).await?;
    Ok((StatusCode::CREATED, Json(CreatedOrderView::from(&order))))
}

/// The caller's orders, newest first
pub async fn list_orders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<OrderView>>> {
    let orders = state.orders.list_orders(user_id).await?;
    Ok(Json(orders.iter().map(OrderView::for_owner).collect()))
}

/// Mark an owned order paid or failed without moving any money
#[instrument(skip(state))]
pub async fn mock_payment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(request): ApiJson<MockPaymentRequest>,
) -> ApiResult<Json<PaymentView>> {
    let order_id = request.order_id.unwrap_or_default();
    let outcome = PaymentOutcome::from_label(request.outcome.as_deref());

    let order = state.orders.record_mock_payment(user_id, &order_id, outcome).await?;

    Ok(Json(PaymentView {
        id: order.id.clone(),
        status: order.status,
        total: order.total,
        items: order.items.iter().map(LineView::from).collect(),
    }))
}
