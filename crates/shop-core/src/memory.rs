//! # In-Memory Store
//!
//! A [`ShopStore`](crate::store::ShopStore) kept in process behind a single
//! lock. Used by tests and as the fallback when no database is configured.
//! Each operation holds the lock for its whole duration, which gives the
//! same all-or-nothing behavior as a database transaction.

use crate::cart::CartLine;
use crate::error::{ShopError, ShopResult};
use crate::order::{Order, OrderDraft, OrderStatus};
use crate::payment_method::{NewPaymentMethod, PaymentMethod};
use crate::product::{CatalogEntry, Product};
use crate::store::{CartStore, CatalogStore, OrderStore, PaymentMethodStore, UserStore, EMAIL_TAKEN};
use crate::updates::{FieldUpdates, FieldValue};
use crate::user::{NewUser, User, UserCredentials};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct CartRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: u32,
    added_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: Vec<UserCredentials>,
    products: Vec<Product>,
    cart: Vec<CartRow>,
    orders: Vec<Order>,
    payment_methods: Vec<PaymentMethod>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|c| c.user.email == email && Some(c.user.id) != except)
    }

    fn clear_defaults(&mut self, user_id: i64) {
        for method in self.payment_methods.iter_mut().filter(|m| m.user_id == user_id) {
            method.is_default = false;
        }
    }

    fn cart_lines(&self, user_id: i64) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = self
            .cart
            .iter()
            .filter(|row| row.user_id == user_id)
            .filter_map(|row| {
                let product = self.products.iter().find(|p| p.id == row.product_id)?;
                Some(CartLine {
                    id: row.id,
                    product_id: row.product_id,
                    product_name: product.name.clone(),
                    quantity: row.quantity,
                    unit_price: product.price,
                    added_at: row.added_at,
                })
            })
            .collect();
        lines.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(b.id.cmp(&a.id)));
        lines
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear a user's admin flag. Returns `false` for unknown users.
    pub async fn set_admin(&self, user_id: i64, is_admin: bool) -> bool {
        let mut state = self.state.lock().await;
        match state.users.iter_mut().find(|c| c.user.id == user_id) {
            Some(creds) => {
                creds.user.is_admin = is_admin;
                true
            }
            None => false,
        }
    }
}

fn unknown_column(column: &str) -> ShopError {
    ShopError::infrastructure(format!("unknown column: {}", column))
}

fn apply_user_update(creds: &mut UserCredentials, column: &str, value: &FieldValue) -> ShopResult<()> {
    let user = &mut creds.user;
    match (column, value) {
        ("first_name", FieldValue::Text(v)) => user.first_name = v.clone(),
        ("last_name", FieldValue::Text(v)) => user.last_name = v.clone(),
        ("email", FieldValue::Text(v)) => user.email = v.clone(),
        ("password_hash", FieldValue::Text(v)) => creds.password_hash = v.clone(),
        ("address", FieldValue::OptionalText(v)) => user.address = v.clone(),
        ("shipping_street", FieldValue::Text(v)) => user.shipping_street = Some(v.clone()),
        ("shipping_city", FieldValue::Text(v)) => user.shipping_city = Some(v.clone()),
        ("shipping_state", FieldValue::Text(v)) => user.shipping_state = Some(v.clone()),
        ("shipping_country", FieldValue::Text(v)) => user.shipping_country = Some(v.clone()),
        ("shipping_zip", FieldValue::Text(v)) => user.shipping_zip = Some(v.clone()),
        ("shipping_phone", FieldValue::Text(v)) => user.shipping_phone = Some(v.clone()),
        (other, _) => return Err(unknown_column(other)),
    }
    Ok(())
}

fn apply_card_update(method: &mut PaymentMethod, column: &str, value: &FieldValue) -> ShopResult<()> {
    match (column, value) {
        ("card_type", FieldValue::Text(v)) => method.card_type = v.clone(),
        ("cardholder_name", FieldValue::Text(v)) => method.cardholder_name = v.clone(),
        ("card_number", FieldValue::Text(v)) => method.card_number = v.clone(),
        ("last_four_digits", FieldValue::Text(v)) => method.last_four_digits = v.clone(),
        ("cvv", FieldValue::Text(v)) => method.cvv = v.clone(),
        ("expiry_date", FieldValue::Text(v)) => method.expiry_date = v.clone(),
        ("billing_zip", FieldValue::Text(v)) => method.billing_zip = v.clone(),
        ("is_default", FieldValue::Bool(v)) => method.is_default = *v,
        (other, _) => return Err(unknown_column(other)),
    }
    Ok(())
}

fn newest_first(orders: impl Iterator<Item = Order>) -> Vec<Order> {
    let mut orders: Vec<Order> = orders.collect();
    // Stable sort keeps later inserts first among equal timestamps
    orders.reverse();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> ShopResult<User> {
        let mut state = self.state.lock().await;
        if state.email_taken(&new_user.email, None) {
            return Err(ShopError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let user = User {
            id: state.next_id(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            address: new_user.address,
            shipping_street: None,
            shipping_city: None,
            shipping_state: None,
            shipping_country: None,
            shipping_zip: None,
            shipping_phone: None,
            is_admin: false,
        };
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(user)
    }

    async fn find_user(&self, user_id: i64) -> ShopResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|c| c.user.id == user_id)
            .map(|c| c.user.clone()))
    }

    async fn find_credentials(&self, email: &str) -> ShopResult<Option<UserCredentials>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|c| c.user.email == email).cloned())
    }

    async fn update_user(&self, user_id: i64, updates: &FieldUpdates) -> ShopResult<Option<User>> {
        let mut state = self.state.lock().await;
        if let Some(FieldValue::Text(email)) = updates.get("email") {
            if state.email_taken(email, Some(user_id)) {
                return Err(ShopError::Conflict(EMAIL_TAKEN.to_string()));
            }
        }

        let Some(creds) = state.users.iter_mut().find(|c| c.user.id == user_id) else {
            return Ok(None);
        };
        let mut updated = creds.clone();
        for (column, value) in updates.iter() {
            apply_user_update(&mut updated, column, value)?;
        }
        *creds = updated;
        Ok(Some(creds.user.clone()))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_products(&self) -> ShopResult<Vec<Product>> {
        let state = self.state.lock().await;
        let mut products = state.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn find_product(&self, product_id: i64) -> ShopResult<Option<Product>> {
        let state = self.state.lock().await;
        Ok(state.products.iter().find(|p| p.id == product_id).cloned())
    }

    async fn upsert_product(&self, entry: &CatalogEntry) -> ShopResult<Product> {
        let mut state = self.state.lock().await;
        if let Some(product) = state.products.iter_mut().find(|p| p.name == entry.name) {
            product.price = entry.price();
            product.description = entry.description.clone();
            product.image_url = entry.image_url.clone();
            return Ok(product.clone());
        }

        let product = Product {
            id: state.next_id(),
            name: entry.name.clone(),
            price: entry.price(),
            description: entry.description.clone(),
            image_url: entry.image_url.clone(),
        };
        state.products.push(product.clone());
        Ok(product)
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn cart_lines(&self, user_id: i64) -> ShopResult<Vec<CartLine>> {
        Ok(self.state.lock().await.cart_lines(user_id))
    }

    async fn add_to_cart(&self, user_id: i64, product_id: i64, quantity: u32) -> ShopResult<()> {
        let mut state = self.state.lock().await;
        if !state.products.iter().any(|p| p.id == product_id) {
            return Err(ShopError::validation("Invalid product"));
        }

        if let Some(row) = state
            .cart
            .iter_mut()
            .find(|r| r.user_id == user_id && r.product_id == product_id)
        {
            row.quantity = row.quantity.saturating_add(quantity);
            return Ok(());
        }

        let id = state.next_id();
        state.cart.push(CartRow {
            id,
            user_id,
            product_id,
            quantity,
            added_at: Utc::now(),
        });
        Ok(())
    }

    async fn set_cart_quantity(&self, user_id: i64, item_id: i64, quantity: u32) -> ShopResult<bool> {
        let mut state = self.state.lock().await;
        match state
            .cart
            .iter_mut()
            .find(|r| r.id == item_id && r.user_id == user_id)
        {
            Some(row) => {
                row.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_cart_item(&self, user_id: i64, item_id: i64) -> ShopResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.cart.len();
        state.cart.retain(|r| !(r.id == item_id && r.user_id == user_id));
        Ok(state.cart.len() != before)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order_from_cart(&self, draft: OrderDraft) -> ShopResult<Order> {
        let mut state = self.state.lock().await;
        let lines = state.cart_lines(draft.user_id);
        let order = Order::from_cart(&draft, &lines)?;

        state.orders.push(order.clone());
        state.cart.retain(|r| r.user_id != draft.user_id);
        Ok(order)
    }

    async fn orders_for_user(&self, user_id: i64) -> ShopResult<Vec<Order>> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state.orders.iter().filter(|o| o.user_id == user_id).cloned(),
        ))
    }

    async fn all_orders(&self) -> ShopResult<Vec<Order>> {
        let state = self.state.lock().await;
        Ok(newest_first(state.orders.iter().cloned()))
    }

    async fn record_payment(
        &self,
        user_id: i64,
        order_id: &str,
        status: OrderStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> ShopResult<Option<Order>> {
        let mut state = self.state.lock().await;
        let Some(order) = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && o.user_id == user_id)
        else {
            return Ok(None);
        };

        order.status = status;
        if paid_at.is_some() {
            order.paid_at = paid_at;
        }
        Ok(Some(order.clone()))
    }

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ShopResult<Option<Order>> {
        let mut state = self.state.lock().await;
        Ok(state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .map(|order| {
                order.status = status;
                order.clone()
            }))
    }
}

#[async_trait]
impl PaymentMethodStore for MemoryStore {
    async fn list_payment_methods(&self, user_id: i64) -> ShopResult<Vec<PaymentMethod>> {
        let state = self.state.lock().await;
        let mut methods: Vec<PaymentMethod> = state
            .payment_methods
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        methods.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(methods)
    }

    async fn find_payment_method(&self, user_id: i64, id: i64) -> ShopResult<Option<PaymentMethod>> {
        let state = self.state.lock().await;
        Ok(state
            .payment_methods
            .iter()
            .find(|m| m.id == id && m.user_id == user_id)
            .cloned())
    }

    async fn default_payment_method(&self, user_id: i64) -> ShopResult<Option<PaymentMethod>> {
        let state = self.state.lock().await;
        Ok(state
            .payment_methods
            .iter()
            .find(|m| m.user_id == user_id && m.is_default)
            .cloned())
    }

    async fn insert_payment_method(&self, user_id: i64, method: NewPaymentMethod) -> ShopResult<i64> {
        let mut state = self.state.lock().await;
        if method.is_default {
            state.clear_defaults(user_id);
        }

        let id = state.next_id();
        state.payment_methods.push(PaymentMethod {
            id,
            user_id,
            card_type: method.card_type,
            cardholder_name: method.cardholder_name,
            card_number: method.card_number,
            last_four_digits: method.last_four_digits,
            cvv: method.cvv,
            expiry_date: method.expiry_date,
            billing_zip: method.billing_zip,
            is_default: method.is_default,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update_payment_method(&self, user_id: i64, id: i64, updates: &FieldUpdates) -> ShopResult<bool> {
        let mut state = self.state.lock().await;
        let Some(idx) = state
            .payment_methods
            .iter()
            .position(|m| m.id == id && m.user_id == user_id)
        else {
            return Ok(false);
        };

        let mut updated = state.payment_methods[idx].clone();
        for (column, value) in updates.iter() {
            apply_card_update(&mut updated, column, value)?;
        }
        if updated.is_default {
            state.clear_defaults(user_id);
        }
        state.payment_methods[idx] = updated;
        Ok(true)
    }

    async fn delete_payment_method(&self, user_id: i64, id: i64) -> ShopResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.payment_methods.len();
        state
            .payment_methods
            .retain(|m| !(m.id == id && m.user_id == user_id));
        Ok(state.payment_methods.len() != before)
    }

    async fn set_default_payment_method(&self, user_id: i64, id: i64) -> ShopResult<bool> {
        let mut state = self.state.lock().await;
        if !state
            .payment_methods
            .iter()
            .any(|m| m.id == id && m.user_id == user_id)
        {
            return Ok(false);
        }

        for method in state.payment_methods.iter_mut().filter(|m| m.user_id == user_id) {
            method.is_default = method.id == id;
        }
        Ok(true)
    }
}
