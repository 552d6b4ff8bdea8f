//! Router tests against the in-memory store

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shop_api::{create_router, AppConfig, AppState};
use shop_core::{
    CatalogEntry, CatalogStore, DeliveryReceipt, DeliveryStatus, MemoryStore, Notifier, NotifyError,
    OrderConfirmation,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingNotifier {
    confirmations: Mutex<Vec<String>>,
    status_updates: Mutex<Vec<(String, String, Option<String>)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_order_confirmation(
        &self,
        confirmation: &OrderConfirmation,
        recipient: &str,
    ) -> Result<DeliveryReceipt, NotifyError> {
        self.confirmations
            .lock()
            .unwrap()
            .push(format!("{}:{}", confirmation.order_id, recipient));
        Ok(DeliveryReceipt {
            provider: "recording",
            message_id: None,
        })
    }

    async fn send_status_update(
        &self,
        order_id: &str,
        recipient: &str,
        status: &DeliveryStatus,
        tracking_url: Option<&str>,
    ) -> Result<DeliveryReceipt, NotifyError> {
        assert!(!recipient.is_empty());
        self.status_updates.lock().unwrap().push((
            order_id.to_string(),
            status.as_str().to_string(),
            tracking_url.map(str::to_string),
        ));
        Ok(DeliveryReceipt {
            provider: "recording",
            message_id: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
    lamp_id: i64,
    mug_id: i64,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let lamp = store
            .upsert_product(&CatalogEntry {
                name: "Desk Lamp".into(),
                price: 10.0,
                description: Some("Warm light".into()),
                image_url: Some("/img/lamp.png".into()),
            })
            .await
            .unwrap();
        let mug = store
            .upsert_product(&CatalogEntry {
                name: "Mug".into(),
                price: 2.5,
                description: None,
                image_url: None,
            })
            .await
            .unwrap();

        let state = AppState::new(AppConfig::default(), store.clone(), notifier.clone())
            .unwrap()
            .with_tracking_url(Some("https://shop.example.com/orderstatus.html".into()));

        Self {
            router: create_router(state),
            store,
            notifier,
            lamp_id: lamp.id,
            mug_id: mug.id,
        }
    }

    async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Register and log in; returns (user id, token)
    async fn sign_up(&self, email: &str) -> (i64, String) {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "email": email,
                    "password": "correct horse"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let id = body["id"].as_i64().unwrap();

        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": "correct horse" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        (id, body["token"].as_str().unwrap().to_string())
    }

    async fn add_to_cart(&self, token: &str, product_id: i64, qty: i64) {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/cart/items",
                Some(token),
                Some(json!({ "productId": product_id, "qty": qty })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }
}

fn error_msg(body: &Value) -> &str {
    body["errors"][0]["msg"].as_str().unwrap_or_default()
}

fn card(number: &str, is_default: bool) -> Value {
    json!({
        "cardType": "visa",
        "cardholderName": "Ada Lovelace",
        "cardNumber": number,
        "expiryDate": "12/30",
        "cvv": "123",
        "billingZip": "94107",
        "isDefault": is_default
    })
}

#[tokio::test]
async fn health_reports_service() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["service"], json!("spark-shop"));
}

#[tokio::test]
async fn register_normalizes_email_and_rejects_duplicates() {
    let app = TestApp::new().await;
    let new_account = json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "  Ada@Example.COM ",
        "password": "correct horse"
    });

    let (status, body) = app
        .request(Method::POST, "/api/auth/register", None, Some(new_account.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], json!("ada@example.com"));

    let (status, body) = app
        .request(Method::POST, "/api/auth/register", None, Some(new_account))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_msg(&body), "Email already registered");
}

#[tokio::test]
async fn register_validates_fields() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "first_name": "Ada", "last_name": "L", "email": "ada@example.com", "password": "correct horse" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_msg(&body), "Last name must be at least 2 characters");
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = TestApp::new().await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth/login")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(!error_msg(&body).is_empty());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::new().await;
    app.sign_up("ada@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong password" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_msg(&body), "Invalid credentials");
}

#[tokio::test]
async fn login_returns_profile_without_secrets() {
    let app = TestApp::new().await;
    app.sign_up("ada@example.com").await;

    let (_, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ADA@example.com", "password": "correct horse" })),
        )
        .await;

    assert_eq!(body["user"]["email"], json!("ada@example.com"));
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("is_admin").is_none());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_msg(&body), "Missing or invalid Authorization header");

    let (status, body) = app.request(Method::GET, "/api/cart", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_msg(&body), "Invalid token");
}

#[tokio::test]
async fn account_update_validates_and_persists() {
    let app = TestApp::new().await;
    let (_, token) = app.sign_up("ada@example.com").await;

    let (status, body) = app
        .request(Method::PUT, "/api/account/me", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_msg(&body), "No fields to update");

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/account/me",
            Some(&token),
            Some(json!({ "shipping_city": "London", "first_name": "Augusta" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request(Method::GET, "/api/account/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], json!("Augusta"));
    assert_eq!(body["shipping_city"], json!("London"));
}

#[tokio::test]
async fn products_are_listed_by_name_in_decimal_dollars() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/products", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["name"], json!("Desk Lamp"));
    assert_eq!(products[0]["price"], json!(10.0));
    assert_eq!(products[0]["imageUrl"], json!("/img/lamp.png"));
    assert_eq!(products[1]["price"], json!(2.5));
}

#[tokio::test]
async fn cart_merges_lines_and_reports_subtotal() {
    let app = TestApp::new().await;
    let (_, token) = app.sign_up("ada@example.com").await;

    app.add_to_cart(&token, app.lamp_id, 1).await;
    app.add_to_cart(&token, app.lamp_id, 2).await;
    app.add_to_cart(&token, app.mug_id, 1).await;

    let (status, body) = app.request(Method::GET, "/api/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let lamp = items.iter().find(|i| i["productId"] == json!(app.lamp_id)).unwrap();
    assert_eq!(lamp["qty"], json!(3));
    assert_eq!(lamp["productName"], json!("Desk Lamp"));
    assert_eq!(body["subtotal"], json!(32.5));
}

#[tokio::test]
async fn cart_rejects_bad_quantities_and_unknown_products() {
    let app = TestApp::new().await;
    let (_, token) = app.sign_up("ada@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/cart/items",
            Some(&token),
            Some(json!({ "productId": app.lamp_id, "qty": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_msg(&body), "Quantity must be at least 1");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/cart/items",
            Some(&token),
            Some(json!({ "productId": 9999 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_msg(&body), "Invalid product");
}

#[tokio::test]
async fn cart_items_of_other_users_are_not_found() {
    let app = TestApp::new().await;
    let (_, ada) = app.sign_up("ada@example.com").await;
    let (_, bob) = app.sign_up("bob@example.com").await;

    app.add_to_cart(&ada, app.lamp_id, 1).await;
    let (_, cart) = app.request(Method::GET, "/api/cart", Some(&ada), None).await;
    let item_id = cart["items"][0]["id"].as_i64().unwrap();
    let uri = format!("/api/cart/items/{}", item_id);

    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&bob), Some(json!({ "qty": 5 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_msg(&body), "Item not found in your cart");

    let (status, _) = app.request(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::PATCH, &uri, Some(&ada), Some(json!({ "qty": 5 })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request(Method::DELETE, &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn checkout_snapshots_cart_and_clears_it() {
    let app = TestApp::new().await;
    let (user_id, token) = app.sign_up("ada@example.com").await;

    app.add_to_cart(&token, app.lamp_id, 2).await;
    app.add_to_cart(&token, app.mug_id, 1).await;

    let (status, order) = app.request(Method::POST, "/api/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["userId"], json!(user_id));
    assert_eq!(order["total"], json!(22.5));
    assert_eq!(order["status"], json!("pending"));
    assert_eq!(order["id"].as_str().unwrap().len(), 12);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    let (_, cart) = app.request(Method::GET, "/api/cart", Some(&token), None).await;
    assert!(cart["items"].as_array().unwrap().is_empty());

    let confirmations = app.notifier.confirmations.lock().unwrap().clone();
    assert_eq!(
        confirmations,
        vec![format!("{}:ada@example.com", order["id"].as_str().unwrap())]
    );
}

#[tokio::test]
async fn checkout_of_empty_cart_fails() {
    let app = TestApp::new().await;
    let (_, token) = app.sign_up("ada@example.com").await;

    let (status, body) = app.request(Method::POST, "/api/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_msg(&body), "Cart is empty");

    let (_, orders) = app.request(Method::GET, "/api/orders", Some(&token), None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn order_history_carries_shipping_and_tax() {
    let app = TestApp::new().await;
    let (_, token) = app.sign_up("ada@example.com").await;

    app.add_to_cart(&token, app.lamp_id, 1).await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/orders",
            Some(&token),
            Some(json!({ "shippingName": "Ada L", "shippingAddress": "1 Loop Rd" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.request(Method::GET, "/api/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let order = &body[0];
    assert_eq!(order["subtotal"], json!(10.0));
    assert_eq!(order["tax"], json!(0.8));
    assert_eq!(order["shippingName"], json!("Ada L"));
    assert_eq!(order["shippingAddress"], json!("1 Loop Rd"));
    assert_eq!(order["shippingPhone"], Value::Null);
    assert_eq!(order["items"][0]["productName"], json!("Desk Lamp"));
    assert!(order.get("userId").is_none());
}

#[tokio::test]
async fn mock_payment_is_owner_scoped() {
    let app = TestApp::new().await;
    let (_, ada) = app.sign_up("ada@example.com").await;
    let (_, bob) = app.sign_up("bob@example.com").await;

    app.add_to_cart(&ada, app.mug_id, 4).await;
    let (_, order) = app.request(Method::POST, "/api/orders", Some(&ada), None).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/payments/mock",
            Some(&bob),
            Some(json!({ "orderId": order_id, "outcome": "success" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_msg(&body), "Order not found");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/payments/mock",
            Some(&ada),
            Some(json!({ "orderId": order_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("paid"));
    assert_eq!(body["total"], json!(10.0));
    assert_eq!(body["items"][0]["qty"], json!(4));

    let (_, body) = app
        .request(
            Method::POST,
            "/api/payments/mock",
            Some(&ada),
            Some(json!({ "orderId": order_id, "outcome": "failure" })),
        )
        .await;
    assert_eq!(body["status"], json!("failed"));
}

#[tokio::test]
async fn admin_routes_require_the_admin_flag() {
    let app = TestApp::new().await;
    let (_, token) = app.sign_up("ada@example.com").await;

    let (status, body) = app.request(Method::GET, "/api/admin/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_msg(&body), "Admin access required");

    let (status, _) = app.request(Method::GET, "/api/admin/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_status_update_emails_owner_when_shipped() {
    let app = TestApp::new().await;
    let (customer_id, customer) = app.sign_up("ada@example.com").await;
    let (admin_id, admin) = app.sign_up("root@example.com").await;
    assert!(app.store.set_admin(admin_id, true).await);

    app.add_to_cart(&customer, app.lamp_id, 1).await;
    let (_, order) = app.request(Method::POST, "/api/orders", Some(&customer), None).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, body) = app.request(Method::GET, "/api/admin/orders", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["userId"], json!(customer_id));

    let uri = format!("/api/admin/orders/{}/status", order_id);
    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&admin), Some(json!({ "status": "  Shipped " })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let updates = app.notifier.status_updates.lock().unwrap().clone();
    assert_eq!(
        updates,
        vec![(
            order_id.clone(),
            "shipped".to_string(),
            Some(format!("https://shop.example.com/orderstatus.html?order={}", order_id)),
        )]
    );

    let (_, orders) = app.request(Method::GET, "/api/orders", Some(&customer), None).await;
    assert_eq!(orders[0]["status"], json!("shipped"));
}

#[tokio::test]
async fn admin_status_update_validates_status_and_order() {
    let app = TestApp::new().await;
    let (admin_id, admin) = app.sign_up("root@example.com").await;
    app.store.set_admin(admin_id, true).await;

    let (status, body) = app
        .request(
            Method::PATCH,
            "/api/admin/orders/000000000000/status",
            Some(&admin),
            Some(json!({ "status": "teleported" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_msg(&body), "Invalid status");

    let (status, body) = app
        .request(
            Method::PATCH,
            "/api/admin/orders/000000000000/status",
            Some(&admin),
            Some(json!({ "status": "paid" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_msg(&body), "Order not found");
    assert!(app.notifier.status_updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn admin_status_update_without_body_is_invalid_status() {
    let app = TestApp::new().await;
    let (admin_id, admin) = app.sign_up("root@example.com").await;
    app.store.set_admin(admin_id, true).await;

    let (status, body) = app
        .request(Method::PATCH, "/api/admin/orders/000000000000/status", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_msg(&body), "Invalid status");
}

#[tokio::test]
async fn malformed_path_ids_use_the_error_envelope() {
    let app = TestApp::new().await;
    let (_, token) = app.sign_up("ada@example.com").await;

    let (status, body) = app
        .request(Method::GET, "/api/payment-methods/abc", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_msg(&body).contains("abc"), "{body}");

    let (status, body) = app
        .request(Method::PATCH, "/api/cart/items/abc", Some(&token), Some(json!({ "qty": 2 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_msg(&body).is_empty(), "{body}");
}

#[tokio::test]
async fn payment_methods_keep_a_single_default() {
    let app = TestApp::new().await;
    let (_, token) = app.sign_up("ada@example.com").await;

    let (status, body) = app
        .request(Method::POST, "/api/payment-methods", Some(&token), Some(card("4111 1111 1111 1111", true)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], json!("Payment method added successfully"));
    let first = body["id"].as_i64().unwrap();

    let (_, body) = app
        .request(Method::POST, "/api/payment-methods", Some(&token), Some(card("5500-0000-0000-0004", true)))
        .await;
    let second = body["id"].as_i64().unwrap();

    let (status, list) = app.request(Method::GET, "/api/payment-methods", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.iter().filter(|m| m["isDefault"] == json!(true)).count(), 1);
    assert_eq!(list[0]["id"], json!(second));
    assert!(list[0].get("cardNumber").is_none());

    let uri = format!("/api/payment-methods/{}/set-default", first);
    let (status, _) = app.request(Method::PUT, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(Method::GET, "/api/payment-methods/default", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(first));
    assert_eq!(body["lastFourDigits"], json!("1111"));
}

#[tokio::test]
async fn payment_method_detail_is_masked_and_owner_scoped() {
    let app = TestApp::new().await;
    let (_, ada) = app.sign_up("ada@example.com").await;
    let (_, bob) = app.sign_up("bob@example.com").await;

    let (_, body) = app
        .request(Method::POST, "/api/payment-methods", Some(&ada), Some(card("4111111111111111", false)))
        .await;
    let uri = format!("/api/payment-methods/{}", body["id"].as_i64().unwrap());

    let (status, body) = app.request(Method::GET, &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cardNumber"], json!("**** **** **** 1111"));
    assert!(body.get("cvv").is_none());

    let (status, body) = app.request(Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_msg(&body), "Payment method not found");

    let (status, _) = app.request(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .request(Method::PUT, &uri, Some(&ada), Some(json!({ "cardNumber": "**** **** **** 1111" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_msg(&body), "No fields to update");

    let (status, body) = app.request(Method::DELETE, &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Payment method deleted successfully"));

    let (status, body) = app
        .request(Method::GET, "/api/payment-methods/default", Some(&ada), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_msg(&body), "No default payment method set");
}

#[tokio::test]
async fn payment_method_create_reports_missing_fields() {
    let app = TestApp::new().await;
    let (_, token) = app.sign_up("ada@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/payment-methods",
            Some(&token),
            Some(json!({ "cardType": "visa", "cardNumber": "4111111111111111" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_msg(&body),
        "Missing required fields: cardholderName, expiryDate, cvv, billingZip"
    );
}
