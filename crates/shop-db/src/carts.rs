//! Cart queries

use crate::{db_error, quantity_from_db, PgStore, MAX_QUANTITY};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shop_core::{CartLine, CartStore, Price, ShopError, ShopResult};
use sqlx::PgExecutor;

/// Insert a line, or add to the existing line for the same product,
/// saturating at `$4`
const MERGE_CART_ITEM: &str = "INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, $3) \
     ON CONFLICT (user_id, product_id) \
     DO UPDATE SET quantity = LEAST(cart_items.quantity + EXCLUDED.quantity, $4)";

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i64,
    product_id: i64,
    product_name: String,
    quantity: i64,
    price_cents: i64,
    added_at: DateTime<Utc>,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = ShopError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        Ok(CartLine {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: quantity_from_db(row.quantity)?,
            unit_price: Price::from_cents(row.price_cents),
            added_at: row.added_at,
        })
    }
}

/// Cart rows joined with current prices, newest first. With `lock` the
/// rows are held `FOR UPDATE` until the surrounding transaction ends.
pub(crate) async fn fetch_cart_lines<'e, E>(executor: E, user_id: i64, lock: bool) -> ShopResult<Vec<CartLine>>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "SELECT c.id, c.product_id, p.name AS product_name, c.quantity, \
                p.price_cents, c.added_at \
         FROM cart_items c \
         JOIN products p ON p.id = c.product_id \
         WHERE c.user_id = $1 \
         ORDER BY c.added_at DESC, c.id DESC{}",
        if lock { " FOR UPDATE OF c" } else { "" }
    );

    let rows: Vec<CartLineRow> = sqlx::query_as(&sql)
        .bind(user_id)
        .fetch_all(executor)
        .await
        .map_err(|e| db_error("cart_lines", e))?;

    rows.into_iter().map(CartLine::try_from).collect()
}

#[async_trait]
impl CartStore for PgStore {
    async fn cart_lines(&self, user_id: i64) -> ShopResult<Vec<CartLine>> {
        fetch_cart_lines(self.pool(), user_id, false).await
    }

    async fn add_to_cart(&self, user_id: i64, product_id: i64, quantity: u32) -> ShopResult<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
            .bind(product_id)
            .fetch_one(self.pool())
            .await
            .map_err(|e| db_error("add_to_cart", e))?;
        if !exists {
            return Err(ShopError::validation("Invalid product"));
        }

        sqlx::query(MERGE_CART_ITEM)
            .bind(user_id)
            .bind(product_id)
            .bind(i64::from(quantity))
            .bind(MAX_QUANTITY)
            .execute(self.pool())
            .await
            .map_err(|e| db_error("add_to_cart", e))?;

        Ok(())
    }

    async fn set_cart_quantity(&self, user_id: i64, item_id: i64, quantity: u32) -> ShopResult<bool> {
        let result = sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2 AND user_id = $3")
            .bind(i64::from(quantity))
            .bind(item_id)
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(|e| db_error("set_cart_quantity", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_cart_item(&self, user_id: i64, item_id: i64) -> ShopResult<bool> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(|e| db_error("remove_cart_item", e))?;

        Ok(result.rows_affected() > 0)
    }
}
