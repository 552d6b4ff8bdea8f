//! Order queries
//!
//! Checkout runs in one transaction: lock and read the cart, insert the
//! order and its items, delete the cart rows, commit. Any error before the
//! commit drops the transaction, which rolls it back.

use crate::carts::fetch_cart_lines;
use crate::{db_error, quantity_from_db, PgStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shop_core::{
    Order, OrderDraft, OrderItem, OrderStatus, OrderStore, Price, ShippingSnapshot, ShopError,
    ShopResult,
};
use sqlx::{Postgres, QueryBuilder};
use std::collections::HashMap;

const ORDER_COLUMNS: &str = "id, user_id, total_cents, status, created_at, paid_at, \
     shipping_name, shipping_email, shipping_phone, shipping_address";

/// Only the lines read under lock are removed; a line added mid-checkout
/// stays in the cart
const CLEAR_ORDERED_LINES: &str = "DELETE FROM cart_items WHERE user_id = $1 AND id = ANY($2)";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: i64,
    total_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
    shipping_name: Option<String>,
    shipping_email: Option<String>,
    shipping_phone: Option<String>,
    shipping_address: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: String,
    product_id: i64,
    product_name: String,
    quantity: i64,
    unit_price_cents: i64,
    line_total_cents: i64,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> ShopResult<Order> {
        let status = OrderStatus::parse(&self.status)
            .map_err(|_| ShopError::infrastructure(format!("unknown order status: {}", self.status)))?;

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            items,
            total: Price::from_cents(self.total_cents),
            status,
            created_at: self.created_at,
            paid_at: self.paid_at,
            shipping: ShippingSnapshot {
                name: self.shipping_name,
                email: self.shipping_email,
                phone: self.shipping_phone,
                address: self.shipping_address,
            },
        })
    }
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = ShopError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(OrderItem {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: quantity_from_db(row.quantity)?,
            unit_price: Price::from_cents(row.unit_price_cents),
            line_total: Price::from_cents(row.line_total_cents),
        })
    }
}

impl PgStore {
    /// Attach items to order rows, preserving row order
    async fn with_items(&self, rows: Vec<OrderRow>) -> ShopResult<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT order_id, product_id, product_name, quantity, unit_price_cents, line_total_cents \
             FROM order_items WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await
        .map_err(|e| db_error("order_items", e))?;

        let mut items: HashMap<String, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            let order_id = row.order_id.clone();
            items.entry(order_id).or_default().push(OrderItem::try_from(row)?);
        }

        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect()
    }

    async fn order_by_id(&self, order_id: &str) -> ShopResult<Option<Order>> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
                .bind(order_id)
                .fetch_optional(self.pool())
                .await
                .map_err(|e| db_error("find_order", e))?;

        match row {
            Some(row) => Ok(self.with_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order_from_cart(&self, draft: OrderDraft) -> ShopResult<Order> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| db_error("create_order", e))?;

        let lines = fetch_cart_lines(&mut *tx, draft.user_id, true).await?;
        let order = Order::from_cart(&draft, &lines)?;

        sqlx::query(
            "INSERT INTO orders (id, user_id, total_cents, status, created_at, \
                shipping_name, shipping_email, shipping_phone, shipping_address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&order.id)
        .bind(order.user_id)
        .bind(order.total.cents())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(&order.shipping.name)
        .bind(&order.shipping.email)
        .bind(&order.shipping.phone)
        .bind(&order.shipping.address)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("create_order", e))?;

        let mut items = QueryBuilder::<Postgres>::new(
            "INSERT INTO order_items \
             (order_id, product_id, product_name, quantity, unit_price_cents, line_total_cents) ",
        );
        items.push_values(&order.items, |mut row, item| {
            row.push_bind(order.id.clone())
                .push_bind(item.product_id)
                .push_bind(item.product_name.clone())
                .push_bind(i64::from(item.quantity))
                .push_bind(item.unit_price.cents())
                .push_bind(item.line_total.cents());
        });
        items
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("create_order", e))?;

        let line_ids: Vec<i64> = lines.iter().map(|line| line.id).collect();
        sqlx::query(CLEAR_ORDERED_LINES)
            .bind(draft.user_id)
            .bind(&line_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("create_order", e))?;

        tx.commit().await.map_err(|e| db_error("create_order", e))?;
        Ok(order)
    }

    async fn orders_for_user(&self, user_id: i64) -> ShopResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| db_error("orders_for_user", e))?;

        self.with_items(rows).await
    }

    async fn all_orders(&self) -> ShopResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| db_error("all_orders", e))?;

        self.with_items(rows).await
    }

    async fn record_payment(
        &self,
        user_id: i64,
        order_id: &str,
        status: OrderStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> ShopResult<Option<Order>> {
        let result = sqlx::query(
            "UPDATE orders SET status = $1, paid_at = COALESCE($2, paid_at) \
             WHERE id = $3 AND user_id = $4",
        )
        .bind(status.as_str())
        .bind(paid_at)
        .bind(order_id)
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| db_error("record_payment", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.order_by_id(order_id).await
    }

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ShopResult<Option<Order>> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(order_id)
            .execute(self.pool())
            .await
            .map_err(|e| db_error("update_order_status", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.order_by_id(order_id).await
    }
}
