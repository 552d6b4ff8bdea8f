//! # Shop Error Types
//!
//! Typed error handling for spark-shop.
//! Every store call and workflow operation returns `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for all shop operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Missing, malformed or expired credential
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated but lacking the admin flag
    #[error("{0}")]
    Forbidden(String),

    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Resource absent, or not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// Unique-constraint violation (duplicate email)
    #[error("{0}")]
    Conflict(String),

    /// Checkout attempted with no cart rows
    #[error("Cart is empty")]
    EmptyCart,

    /// Storage or network failure. The detail is for logs only.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ShopError {
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        ShopError::Unauthenticated(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ShopError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ShopError::NotFound(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        ShopError::Infrastructure(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        ShopError::Configuration(msg.into())
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Unauthenticated(_) => 401,
            ShopError::Forbidden(_) => 403,
            ShopError::Validation(_) => 400,
            ShopError::NotFound(_) => 404,
            ShopError::Conflict(_) => 409,
            ShopError::EmptyCart => 400,
            ShopError::Infrastructure(_) | ShopError::Configuration(_) => 500,
        }
    }

    /// Message safe to return to a client
    pub fn public_message(&self) -> String {
        match self {
            ShopError::Infrastructure(_) | ShopError::Configuration(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for shop operations
pub type ShopResult<T> = Result<T, ShopError>;
