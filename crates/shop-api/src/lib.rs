//! # shop-api
//!
//! HTTP API layer for spark-shop.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Bearer-token extractors for signed-in and admin callers
//! - REST endpoints for accounts, catalog, cart, orders and saved cards
//! - The `{"errors": [{"msg": ...}]}` error envelope
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/health` | Health check |
//! | POST | `/api/auth/register` | Create account |
//! | POST | `/api/auth/login` | Get a session token |
//! | GET/PUT | `/api/account/me` | Profile |
//! | GET | `/api/products` | List products |
//! | GET | `/api/cart` | Cart with subtotal |
//! | POST | `/api/cart/items` | Add to cart |
//! | PATCH/DELETE | `/api/cart/items/{id}` | Change or remove a line |
//! | GET/POST | `/api/orders` | Order history / checkout |
//! | POST | `/api/payments/mock` | Mock payment |
//! | * | `/api/payment-methods[/...]` | Saved cards |
//! | GET | `/api/admin/orders` | All orders (admin) |
//! | PATCH | `/api/admin/orders/{id}/status` | Set order status (admin) |

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
