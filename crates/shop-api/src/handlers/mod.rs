//! # Request Handlers
//!
//! Axum handlers grouped by resource. Request and response bodies are
//! defined beside the handlers that use them.

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod payment_methods;

use crate::error::ApiResult;
use axum::{body::Bytes, response::IntoResponse, Json};
use serde::{de::DeserializeOwned, Serialize};
use shop_core::ShopError;

/// `{"ok": true}`
#[derive(Debug, Serialize)]
pub struct Acknowledged {
    pub ok: bool,
}

pub fn acknowledged() -> Json<Acknowledged> {
    Json(Acknowledged { ok: true })
}

/// `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "service": "spark-shop",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Parse a JSON body that may be missing entirely
pub(crate) fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ShopError::validation(format!("Invalid JSON body: {}", e)).into())
}
