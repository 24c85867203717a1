//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use store::MemoryStore;
use tower::ServiceExt;
use uuid::Uuid;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let store = MemoryStore::new();
    let state = api::create_state(store, 50);
    api::create_app(state, get_metrics_handle())
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn seed_product(app: &axum::Router, id: &str, stock: u32, price_cents: i64) {
    let category = Uuid::new_v4().to_string();
    let (status, _) = send(
        app,
        "POST",
        "/products",
        Some(serde_json::json!({
            "id": id,
            "name": format!("Product {id}"),
            "category_id": category,
            "unit_price": price_cents,
            "unit": "pcs",
            "stock_quantity": stock,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn add_to_cart(app: &axum::Router, customer: &str, product: &str, quantity: u32) {
    let (status, _) = send(
        app,
        "POST",
        &format!("/cart/{customer}/items"),
        Some(serde_json::json!({ "product_id": product, "quantity": quantity })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn cash_checkout_body() -> serde_json::Value {
    serde_json::json!({
        "delivery_address": "1 Main St",
        "delivery_phone": "555-0100",
        "payment_method": "cash",
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_full_checkout_flow() {
    let app = setup();
    let customer = Uuid::new_v4().to_string();

    seed_product(&app, "SKU-A", 5, 1000).await;
    seed_product(&app, "SKU-B", 2, 400).await;
    add_to_cart(&app, &customer, "SKU-A", 3).await;
    add_to_cart(&app, &customer, "SKU-B", 2).await;

    let (status, cart) = send(&app, "GET", &format!("/cart/{customer}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["total_cents"], 3800);

    let (status, receipt) = send(
        &app,
        "POST",
        &format!("/checkout/{customer}"),
        Some(cash_checkout_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["total_amount"], 3800);
    assert_eq!(receipt["final_amount"], 3800);
    let order_id = receipt["order_id"].as_str().unwrap().to_string();
    let order_number = receipt["order_number"].as_str().unwrap().to_string();
    assert!(order_number.starts_with("ORD-"));

    // Cart is empty, stock is decremented.
    let (_, cart) = send(&app, "GET", &format!("/cart/{customer}"), None).await;
    assert!(cart["items"].as_array().unwrap().is_empty());

    let (_, product) = send(&app, "GET", "/products/SKU-A", None).await;
    assert_eq!(product["stock_quantity"], 2);
    let (_, product) = send(&app, "GET", "/products/SKU-B", None).await;
    assert_eq!(product["stock_quantity"], 0);

    // The order is durable and carries snapshots.
    let (status, order) = send(&app, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["order_number"], order_number.as_str());
    assert_eq!(order["status"], "pending");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    // Exactly one order_placed notification.
    let (_, inbox) = send(
        &app,
        "GET",
        &format!("/customers/{customer}/notifications"),
        None,
    )
    .await;
    let inbox = inbox.as_array().unwrap().clone();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["kind"], "order_placed");

    let (_, badge) = send(
        &app,
        "GET",
        &format!("/customers/{customer}/notifications/unread-count"),
        None,
    )
    .await;
    assert_eq!(badge["unread"], 1);
}

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected() {
    let app = setup();
    let customer = Uuid::new_v4().to_string();

    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{customer}"),
        Some(cash_checkout_body()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "cart is empty");
}

#[tokio::test]
async fn test_insufficient_stock_maps_to_conflict() {
    let app = setup();
    let customer = Uuid::new_v4().to_string();

    seed_product(&app, "SKU-C", 1, 700).await;
    add_to_cart(&app, &customer, "SKU-C", 1).await;

    // Push the line beyond stock through the unchecked quantity edit.
    let (_, cart) = send(&app, "GET", &format!("/cart/{customer}"), None).await;
    let line_id = cart["items"][0]["line_id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/cart/lines/{line_id}"),
        Some(serde_json::json!({ "quantity": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{customer}"),
        Some(cash_checkout_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("SKU-C"));

    // Nothing moved.
    let (_, product) = send(&app, "GET", "/products/SKU-C", None).await;
    assert_eq!(product["stock_quantity"], 1);
    let (_, cart) = send(&app, "GET", &format!("/cart/{customer}"), None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_adding_more_than_stock_is_rejected() {
    let app = setup();
    let customer = Uuid::new_v4().to_string();

    seed_product(&app, "SKU-D", 2, 100).await;
    let (status, json) = send(
        &app,
        "POST",
        &format!("/cart/{customer}/items"),
        Some(serde_json::json!({ "product_id": "SKU-D", "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("SKU-D"));
}

#[tokio::test]
async fn test_order_status_transitions_and_notifications() {
    let app = setup();
    let customer = Uuid::new_v4().to_string();

    seed_product(&app, "SKU-E", 5, 500).await;
    add_to_cart(&app, &customer, "SKU-E", 1).await;
    let (_, receipt) = send(
        &app,
        "POST",
        &format!("/checkout/{customer}"),
        Some(cash_checkout_body()),
    )
    .await;
    let order_id = receipt["order_id"].as_str().unwrap().to_string();

    let (status, order) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/status"),
        Some(serde_json::json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "confirmed");
    assert!(order["confirmed_at"].is_string());

    let (status, json) = send(
        &app,
        "POST",
        &format!("/orders/{order_id}/status"),
        Some(serde_json::json!({ "status": "refunded" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("refunded"));

    let (_, inbox) = send(
        &app,
        "GET",
        &format!("/customers/{customer}/notifications"),
        None,
    )
    .await;
    // order_placed + order_confirmed.
    assert_eq!(inbox.as_array().unwrap().len(), 2);
    assert_eq!(inbox[0]["kind"], "order_confirmed");

    // Mark the confirmation read; the badge drops to 1.
    let notification_id = inbox[0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/notifications/{notification_id}/read"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, badge) = send(
        &app,
        "GET",
        &format!("/customers/{customer}/notifications/unread-count"),
        None,
    )
    .await;
    assert_eq!(badge["unread"], 1);
}

#[tokio::test]
async fn test_card_checkout_validates_details() {
    let app = setup();
    let customer = Uuid::new_v4().to_string();

    seed_product(&app, "SKU-F", 5, 500).await;
    add_to_cart(&app, &customer, "SKU-F", 1).await;

    // Missing card details.
    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{customer}"),
        Some(serde_json::json!({
            "delivery_address": "1 Main St",
            "delivery_phone": "555-0100",
            "payment_method": "card",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "card_number is required");

    // Malformed card number.
    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{customer}"),
        Some(serde_json::json!({
            "delivery_address": "1 Main St",
            "delivery_phone": "555-0100",
            "payment_method": "card",
            "card_number": "1234",
            "card_expiry": "12/99",
            "card_cvv": "123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Card number must be 16 digits");

    // Valid details go through.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/checkout/{customer}"),
        Some(serde_json::json!({
            "delivery_address": "1 Main St",
            "delivery_phone": "555-0100",
            "payment_method": "card",
            "card_number": "4242 4242 4242 4242",
            "card_expiry": "12/99",
            "card_cvv": "123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_product_and_order_are_404() {
    let app = setup();

    let (status, _) = send(&app, "GET", "/products/SKU-NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let missing = Uuid::new_v4();
    let (status, _) = send(&app, "GET", &format!("/orders/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_search_and_low_stock() {
    let app = setup();

    seed_product(&app, "SKU-APPLES", 20, 250).await;
    seed_product(&app, "SKU-BREAD", 1, 150).await;

    let (status, results) = send(&app, "GET", "/products?search=apples", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["id"], "SKU-APPLES");

    // SKU-BREAD has 1 in stock against the default minimum of 5.
    let (status, low) = send(&app, "GET", "/products/low-stock", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(low.as_array().unwrap().len(), 1);
    assert_eq!(low[0]["id"], "SKU-BREAD");
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
