//! # Routes
//!
//! Axum router configuration. Everything lives under `/api`.

use crate::handlers::{self, account, admin, auth, cart, catalog, orders, payment_methods};
use crate::state::AppState;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Public:
///   - GET  /api/health
///   - POST /api/auth/register, /api/auth/login
///   - GET  /api/products
///
/// - Signed in (`Authorization: Bearer <token>`):
///   - GET|PUT /api/account/me
///   - GET /api/cart, POST /api/cart/items, PATCH|DELETE /api/cart/items/{id}
///   - GET|POST /api/orders, POST /api/payments/mock
///   - /api/payment-methods (CRUD, `default`, `{id}/set-default`)
///
/// - Admin:
///   - GET   /api/admin/orders
///   - PATCH /api/admin/orders/{id}/status
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let admin_routes = Router::new()
        .route("/orders", get(admin::list_all_orders))
        .route("/orders/{order_id}/status", patch(admin::update_order_status));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .nest("/auth", auth_routes)
        // Account
        .route("/account/me", get(account::get_account).put(account::update_account))
        // Catalog
        .route("/products", get(catalog::list_products))
        // Cart
        .route("/cart", get(cart::get_cart))
        .route("/cart/items", post(cart::add_item))
        .route("/cart/items/{item_id}", patch(cart::update_item).delete(cart::remove_item))
        // Orders
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route("/payments/mock", post(orders::mock_payment))
        // Payment methods
        .route(
            "/payment-methods",
            get(payment_methods::list_payment_methods).post(payment_methods::create_payment_method),
        )
        .route("/payment-methods/default", get(payment_methods::default_payment_method))
        .route(
            "/payment-methods/{id}",
            get(payment_methods::get_payment_method)
                .put(payment_methods::update_payment_method)
                .delete(payment_methods::delete_payment_method),
        )
        .route("/payment-methods/{id}/set-default", put(payment_methods::set_default_payment_method))
        .nest("/admin", admin_routes);

    Router::new()
        .nest("/api", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
