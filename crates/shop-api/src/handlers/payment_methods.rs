//! Saved cards of the signed-in user

use super::Message;
use crate::error::{ApiJson, ApiPath, ApiResult};
use crate::extract::AuthUser;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shop_core::{
    DefaultPaymentMethod, MaskedPaymentMethod, PaymentMethodPatch, PaymentMethodRequest, PaymentMethodSummary,
};
use tracing::instrument;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}

/// Default first, then newest; never includes card numbers
pub async fn list_payment_methods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<PaymentMethodSummary>>> {
    Ok(Json(state.wallet.list(user_id).await?))
}

/// One card with its number masked down to the last four digits
pub async fn get_payment_method(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MaskedPaymentMethod>> {
    Ok(Json(state.wallet.get(user_id, id).await?))
}

pub async fn default_payment_method(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<DefaultPaymentMethod>> {
    Ok(Json(state.wallet.default_method(user_id).await?))
}

#[instrument(skip(state, request))]
pub async fn create_payment_method(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(request): ApiJson<PaymentMethodRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.wallet.create(user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Payment method added successfully",
            id,
        }),
    ))
}

#[instrument(skip(state, patch))]
pub async fn update_payment_method(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<PaymentMethodPatch>,
) -> ApiResult<Json<Message>> {
    state.wallet.update(user_id, id, patch).await?;
    Ok(Json(Message {
        message: "Payment method updated successfully",
    }))
}

#[instrument(skip(state))]
pub async fn delete_payment_method(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Message>> {
    state.wallet.delete(user_id, id).await?;
    Ok(Json(Message {
        message: "Payment method deleted successfully",
    }))
}

#[instrument(skip(state))]
pub async fn set_default_payment_method(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Message>> {
    state.wallet.set_default(user_id, id).await?;
    Ok(Json(Message {
        message: "Default payment method updated successfully",
    }))
}
