//! Payment method queries
//!
//! Writes that set `is_default` clear the user's other defaults first, in
//! the same transaction. The partial unique index on `(user_id) WHERE
//! is_default` backs this up at the schema level.

use crate::updates::update_statement;
use crate::{db_error, PgStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shop_core::{
    FieldUpdates, FieldValue, NewPaymentMethod, PaymentMethod, PaymentMethodStore, ShopResult,
};
use sqlx::PgExecutor;

const METHOD_COLUMNS: &str = "id, user_id, card_type, cardholder_name, card_number, \
     last_four_digits, cvv, expiry_date, billing_zip, is_default, created_at";

#[derive(Debug, sqlx::FromRow)]
struct PaymentMethodRow {
    id: i64,
    user_id: i64,
    card_type: String,
    cardholder_name: String,
    card_number: String,
    last_four_digits: String,
    cvv: String,
    expiry_date: String,
    billing_zip: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<PaymentMethodRow> for PaymentMethod {
    fn from(row: PaymentMethodRow) -> Self {
        PaymentMethod {
            id: row.id,
            user_id: row.user_id,
            card_type: row.card_type,
            cardholder_name: row.cardholder_name,
            card_number: row.card_number,
            last_four_digits: row.last_four_digits,
            cvv: row.cvv,
            expiry_date: row.expiry_date,
            billing_zip: row.billing_zip,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

async fn clear_defaults<'e, E>(executor: E, user_id: i64, except: Option<i64>) -> ShopResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        "UPDATE payment_methods SET is_default = FALSE \
         WHERE user_id = $1 AND is_default AND id IS DISTINCT FROM $2",
    )
    .bind(user_id)
    .bind(except)
    .execute(executor)
    .await
    .map_err(|e| db_error("clear_default_payment_methods", e))?;
    Ok(())
}

async fn owns<'e, E>(executor: E, user_id: i64, id: i64) -> ShopResult<bool>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM payment_methods WHERE id = $1 AND user_id = $2)")
        .bind(id)
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(|e| db_error("find_payment_method", e))
}

#[async_trait]
impl PaymentMethodStore for PgStore {
    async fn list_payment_methods(&self, user_id: i64) -> ShopResult<Vec<PaymentMethod>> {
        let rows: Vec<PaymentMethodRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_methods WHERE user_id = $1 \
             ORDER BY is_default DESC, created_at DESC, id DESC",
            METHOD_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| db_error("list_payment_methods", e))?;

        Ok(rows.into_iter().map(PaymentMethod::from).collect())
    }

    async fn find_payment_method(&self, user_id: i64, id: i64) -> ShopResult<Option<PaymentMethod>> {
        let row: Option<PaymentMethodRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_methods WHERE id = $1 AND user_id = $2",
            METHOD_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| db_error("find_payment_method", e))?;

        Ok(row.map(PaymentMethod::from))
    }

    async fn default_payment_method(&self, user_id: i64) -> ShopResult<Option<PaymentMethod>> {
        let row: Option<PaymentMethodRow> = sqlx::query_as(&format!(
            "SELECT {} FROM payment_methods WHERE user_id = $1 AND is_default LIMIT 1",
            METHOD_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| db_error("default_payment_method", e))?;

        Ok(row.map(PaymentMethod::from))
    }

    async fn insert_payment_method(&self, user_id: i64, method: NewPaymentMethod) -> ShopResult<i64> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| db_error("insert_payment_method", e))?;

        if method.is_default {
            clear_defaults(&mut *tx, user_id, None).await?;
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO payment_methods \
             (user_id, card_type, cardholder_name, card_number, last_four_digits, cvv, \
              expiry_date, billing_zip, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
        )
        .bind(user_id)
        .bind(&method.card_type)
        .bind(&method.cardholder_name)
        .bind(&method.card_number)
        .bind(&method.last_four_digits)
        .bind(&method.cvv)
        .bind(&method.expiry_date)
        .bind(&method.billing_zip)
        .bind(method.is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("insert_payment_method", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("insert_payment_method", e))?;
        Ok(id)
    }

    async fn update_payment_method(&self, user_id: i64, id: i64, updates: &FieldUpdates) -> ShopResult<bool> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| db_error("update_payment_method", e))?;

        if !owns(&mut *tx, user_id, id).await? {
            return Ok(false);
        }
        if updates.get("is_default") == Some(&FieldValue::Bool(true)) {
            clear_defaults(&mut *tx, user_id, Some(id)).await?;
        }

        let mut builder = update_statement("payment_methods", updates);
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(user_id);
        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("update_payment_method", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("update_payment_method", e))?;
        Ok(true)
    }

    async fn delete_payment_method(&self, user_id: i64, id: i64) -> ShopResult<bool> {
        let result = sqlx::query("DELETE FROM payment_methods WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(|e| db_error("delete_payment_method", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_default_payment_method(&self, user_id: i64, id: i64) -> ShopResult<bool> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| db_error("set_default_payment_method", e))?;

        if !owns(&mut *tx, user_id, id).await? {
            return Ok(false);
        }
        clear_defaults(&mut *tx, user_id, Some(id)).await?;

        sqlx::query("UPDATE payment_methods SET is_default = TRUE WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("set_default_payment_method", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("set_default_payment_method", e))?;
        Ok(true)
    }
}
