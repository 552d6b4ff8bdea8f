//! Admin order management

use super::orders::OrderView;
use super::{acknowledged, optional_body, Acknowledged};
use crate::error::{ApiPath, ApiResult};
use crate::extract::AdminUser;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// Every order across all users, newest first
pub async fn list_all_orders(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> ApiResult<Json<Vec<OrderView>>> {
    let orders = state.orders.list_all_orders().await?;
    Ok(Json(orders.iter().map(OrderView::for_admin).collect()))
}

/// Set any enumerated status; shipped and delivered email the owner
#[instrument(skip(state, body))]
pub async fn update_order_status(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    ApiPath(order_id): ApiPath<String>,
    body: Bytes,
) -> ApiResult<Json<Acknowledged>> {
    let request: StatusRequest = optional_body(&body)?;
    let status = request.status.unwrap_or_default();
    state.orders.update_status(&order_id, &status).await?;
    Ok(acknowledged())
}
