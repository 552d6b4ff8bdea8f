//! Profile of the signed-in user

use super::{acknowledged, Acknowledged};
use crate::error::{ApiJson, ApiResult};
use crate::extract::AuthUser;
use crate::state::AppState;
use axum::{extract::State, Json};
use shop_core::{AccountUpdate, ShopError, User, UserStore};
use tracing::{info, instrument};

const USER_NOT_FOUND: &str = "User not found";

pub async fn get_account(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> ApiResult<Json<User>> {
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ShopError::not_found(USER_NOT_FOUND))?;
    Ok(Json(user))
}

/// Partial profile update; absent fields are left alone
#[instrument(skip(state, update))]
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(update): ApiJson<AccountUpdate>,
) -> ApiResult<Json<Acknowledged>> {
    let updates = update.into_updates()?;
    let columns = updates.len();

    state
        .store
        .update_user(user_id, &updates)
        .await?
        .ok_or_else(|| ShopError::not_found(USER_NOT_FOUND))?;

    info!(columns, "Account updated");
    Ok(acknowledged())
}
