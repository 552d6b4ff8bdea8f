//! Bearer-token extractors.
//!
//! ```rust,ignore
//! async fn handler(AuthUser(user_id): AuthUser) -> impl IntoResponse { ... }
//! async fn admin_handler(AdminUser(user_id): AdminUser) -> impl IntoResponse { ... }
//! ```

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use shop_core::{ShopError, UserStore};
use tracing::debug;

/// Id of the caller, from a valid `Authorization: Bearer <token>` header
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        let user_id = state.tokens.validate_header(header).map_err(|e| {
            debug!(error = %e, "Rejected credentials");
            e
        })?;
        Ok(AuthUser(user_id))
    }
}

/// Authenticated caller whose account carries the admin flag.
///
/// The flag is read from the store on every request, so revoking it takes
/// effect without waiting for the token to expire.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub i64);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;

        let user = state
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ShopError::unauthenticated("User not found"))?;

        if !user.is_admin {
            return Err(ShopError::Forbidden("Admin access required".to_string()).into());
        }
        Ok(AdminUser(user_id))
    }
}
