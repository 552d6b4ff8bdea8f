//! # API Errors
//!
//! Every failure leaves the API as `{"errors": [{"msg": "..."}]}` with the
//! status code of the underlying [`ShopError`].

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shop_core::ShopError;
use tracing::error;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorMessage>,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub msg: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorMessage { msg: msg.into() }],
        }
    }
}

/// Handler error wrapping the core taxonomy
#[derive(Debug)]
pub struct ApiError(pub ShopError);

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ShopError::validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(ShopError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.status_code();
        if code >= 500 {
            error!(error = %self.0, "Request failed");
        }
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::new(self.0.public_message()))).into_response()
    }
}

/// `Json` extractor whose rejections use the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejections use the error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let body = serde_json::to_value(ErrorResponse::new("Invalid email")).unwrap();
        assert_eq!(body, serde_json::json!({ "errors": [{ "msg": "Invalid email" }] }));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ShopError::unauthenticated("Invalid token"), StatusCode::UNAUTHORIZED),
            (ShopError::Forbidden("Admin access required".into()), StatusCode::FORBIDDEN),
            (ShopError::validation("Invalid email"), StatusCode::BAD_REQUEST),
            (ShopError::not_found("Order not found"), StatusCode::NOT_FOUND),
            (ShopError::Conflict("Email already registered".into()), StatusCode::CONFLICT),
            (ShopError::EmptyCart, StatusCode::BAD_REQUEST),
            (ShopError::infrastructure("pool timed out"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }
}
