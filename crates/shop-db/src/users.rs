//! User queries

use crate::updates::update_statement;
use crate::{conflict_or_db_error, db_error, PgStore};
use async_trait::async_trait;
use shop_core::store::EMAIL_TAKEN;
use shop_core::{FieldUpdates, NewUser, ShopResult, User, UserCredentials, UserStore};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, address, \
     shipping_street, shipping_city, shipping_state, shipping_country, shipping_zip, \
     shipping_phone, is_admin";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    address: Option<String>,
    shipping_street: Option<String>,
    shipping_city: Option<String>,
    shipping_state: Option<String>,
    shipping_country: Option<String>,
    shipping_zip: Option<String>,
    shipping_phone: Option<String>,
    is_admin: bool,
}

impl From<UserRow> for UserCredentials {
    fn from(row: UserRow) -> Self {
        UserCredentials {
            user: User {
                id: row.id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                address: row.address,
                shipping_street: row.shipping_street,
                shipping_city: row.shipping_city,
                shipping_state: row.shipping_state,
                shipping_country: row.shipping_country,
                shipping_zip: row.shipping_zip,
                shipping_phone: row.shipping_phone,
                is_admin: row.is_admin,
            },
            password_hash: row.password_hash,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> ShopResult<User> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.address)
        .fetch_one(self.pool())
        .await
        .map_err(|e| conflict_or_db_error("create_user", EMAIL_TAKEN, e))?;

        Ok(UserCredentials::from(row).user)
    }

    async fn find_user(&self, user_id: i64) -> ShopResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(user_id)
                .fetch_optional(self.pool())
                .await
                .map_err(|e| db_error("find_user", e))?;

        Ok(row.map(|r| UserCredentials::from(r).user))
    }

    async fn find_credentials(&self, email: &str) -> ShopResult<Option<UserCredentials>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
                .bind(email)
                .fetch_optional(self.pool())
                .await
                .map_err(|e| db_error("find_credentials", e))?;

        Ok(row.map(UserCredentials::from))
    }

    async fn update_user(&self, user_id: i64, updates: &FieldUpdates) -> ShopResult<Option<User>> {
        let mut builder = update_statement("users", updates);
        builder
            .push(" WHERE id = ")
            .push_bind(user_id)
            .push(" RETURNING ")
            .push(USER_COLUMNS);

        let row: Option<UserRow> = builder
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(|e| conflict_or_db_error("update_user", EMAIL_TAKEN, e))?;

        Ok(row.map(|r| UserCredentials::from(r).user))
    }
}
