//! Cart of the signed-in user

use super::{acknowledged, Acknowledged};
use crate::error::{ApiJson, ApiPath, ApiResult};
use crate::extract::AuthUser;
use crate::state::AppState;
use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use shop_core::cart::{self, validate_quantity};
use shop_core::{CartLine, CartStore, Price, ShopError};
use tracing::{info, instrument};

const ITEM_NOT_FOUND: &str = "Item not found in your cart";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub qty: u32,
    pub price: Price,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            qty: line.quantity,
            price: line.unit_price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Price,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: Option<i64>,
    #[serde(default = "default_qty")]
    pub qty: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub qty: i64,
}

fn default_qty() -> i64 {
    1
}

/// Cart lines, newest first, with the subtotal at current prices
pub async fn get_cart(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> ApiResult<Json<CartView>> {
    let lines = state.store.cart_lines(user_id).await?;
    Ok(Json(CartView {
        items: lines.iter().map(CartItemView::from).collect(),
        subtotal: cart::subtotal(&lines),
    }))
}

/// Add a product, merging with an existing line for it
#[instrument(skip(state))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(request): ApiJson<AddItemRequest>,
) -> ApiResult<Json<Acknowledged>> {
    let qty = validate_quantity(request.qty)?;
    let product_id = request
        .product_id
        .ok_or_else(|| ShopError::validation("Invalid product"))?;

    state.store.add_to_cart(user_id, product_id, qty).await?;
    info!(product_id, qty, "Added to cart");
    Ok(acknowledged())
}

#[instrument(skip(state))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(item_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateItemRequest>,
) -> ApiResult<Json<Acknowledged>> {
    let qty = validate_quantity(request.qty)?;
    if !state.store.set_cart_quantity(user_id, item_id, qty).await? {
        return Err(ShopError::not_found(ITEM_NOT_FOUND).into());
    }
    Ok(acknowledged())
}

#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(item_id): ApiPath<i64>,
) -> ApiResult<Json<Acknowledged>> {
    if !state.store.remove_cart_item(user_id, item_id).await? {
        return Err(ShopError::not_found(ITEM_NOT_FOUND).into());
    }
    Ok(acknowledged())
}
