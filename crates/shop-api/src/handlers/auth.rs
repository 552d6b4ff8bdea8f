//! Registration and login

use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use shop_core::auth::verify_password;
use shop_core::{Login, Registration, ShopError, User, UserStore};
use tracing::{info, instrument};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Create an account
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<Registration>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let new_user = request.validate()?;
    let user = state.store.create_user(new_user).await?;
    info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

/// Exchange credentials for a session token
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<Login>,
) -> ApiResult<Json<LoginResponse>> {
    let (email, password) = request.validate()?;

    let credentials = state
        .store
        .find_credentials(&email)
        .await?
        .filter(|c| verify_password(&password, &c.password_hash))
        .ok_or_else(|| ShopError::unauthenticated(INVALID_CREDENTIALS))?;

    let token = state.tokens.issue(&credentials.user).map_err(ShopError::from)?;
    info!(user_id = credentials.user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: credentials.user,
    }))
}
