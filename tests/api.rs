//! End-to-end tests against the HTTP router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use commerce_backoffice::{api, AppState, Config};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        port: 0,
        data_dir: dir.path().to_path_buf(),
        auth_secret: "integration-test-secret".to_string(),
        courier: None,
    };
    (api::router(AppState::new(config)), dir)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => Request::builder().method(method).uri(uri).body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seed_product(app: &Router, id: &str, stock: u32) {
    let (status, _) = send(
        app,
        "POST",
        "/api/v1/products",
        Some(json!({"id": id, "name": "Basic Tee", "price": 10, "category": "Shirts", "stock": stock})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn seed_order(app: &Router, product_id: &str, quantity: u32) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/orders",
        Some(json!({
            "customer": {"name": "Jane", "phone": "555-0101"},
            "items": [{"id": product_id, "quantity": quantity, "price": 10}],
            "totalAmount": 10 * quantity,
            "shippingAddress": "12 Hill St",
            "paymentMethod": "cod"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["order"]["status"], json!("processing"));
    body["order"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
}

#[tokio::test]
async fn test_order_creation_decrements_stock_end_to_end() {
    let (app, _dir) = test_app();
    seed_product(&app, "P1", 10).await;

    let id = seed_order(&app, "P1", 3).await;
    assert_eq!(id, "AN1");

    let (status, products) = send(&app, "GET", "/api/v1/products?showAllStock=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products[0]["stock"], json!(7));
}

#[tokio::test]
async fn test_product_filters() {
    let (app, _dir) = test_app();
    seed_product(&app, "P1", 0).await;
    seed_product(&app, "P2", 4).await;

    // out-of-stock products hidden by default
    let (_, visible) = send(&app, "GET", "/api/v1/products", None).await;
    assert_eq!(visible.as_array().unwrap().len(), 1);
    assert_eq!(visible[0]["id"], json!("P2"));

    let (_, all) = send(&app, "GET", "/api/v1/products?showAllStock=true", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    // category match is case-insensitive
    let (_, shirts) = send(&app, "GET", "/api/v1/products?category=SHIRTS&showAllStock=true", None).await;
    assert_eq!(shirts.as_array().unwrap().len(), 2);
    let (_, none) = send(&app, "GET", "/api/v1/products?category=Pants", None).await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_status_label_is_bad_request() {
    let (app, _dir) = test_app();
    seed_product(&app, "P1", 10).await;
    let id = seed_order(&app, "P1", 1).await;

    let (status, body) =
        send(&app, "PUT", &format!("/api/v1/orders/{id}"), Some(json!({"status": "teleported"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let (app, _dir) = test_app();
    let (status, body) = send(&app, "GET", "/api/v1/orders/AN99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_order_missing_items_is_bad_request() {
    let (app, _dir) = test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/orders",
        Some(json!({"customer": "Jane", "items": [], "totalAmount": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_customer_string_shape_normalized() {
    let (app, _dir) = test_app();
    seed_product(&app, "P1", 5).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        Some(json!({
            "customer": "Walk-in Customer",
            "items": [{"id": "P1", "quantity": 1, "price": 10}],
            "totalAmount": 10
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["customer"]["name"], json!("Walk-in Customer"));
}

#[tokio::test]
async fn test_bulk_cancel_reports_count_returns_stock_once() {
    let (app, _dir) = test_app();
    seed_product(&app, "P1", 10).await;
    let first = seed_order(&app, "P1", 3).await;
    let second = seed_order(&app, "P1", 2).await;

    // cancel the second ahead of the bulk call
    let (status, _) =
        send(&app, "PUT", &format!("/api/v1/orders/{second}"), Some(json!({"status": "cancelled"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/orders/bulk",
        Some(json!({"orderIds": [first, second], "status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], json!(2));

    let (_, products) = send(&app, "GET", "/api/v1/products?showAllStock=true", None).await;
    assert_eq!(products[0]["stock"], json!(10));
}

#[tokio::test]
async fn test_order_listing_sorted_processing_first() {
    let (app, _dir) = test_app();
    seed_product(&app, "P1", 100).await;
    let first = seed_order(&app, "P1", 1).await;
    let _second = seed_order(&app, "P1", 1).await;
    let third = seed_order(&app, "P1", 1).await;

    let (status, _) =
        send(&app, "PUT", &format!("/api/v1/orders/{first}"), Some(json!({"status": "completed"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, "GET", "/api/v1/orders", None).await;
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    // the completed order sorts after the processing ones
    assert_eq!(ids, vec![third.as_str(), "AN2", first.as_str()]);
    assert!(listed[2]["completedAt"].is_string());
}

#[tokio::test]
async fn test_auth_register_approve_login_flow() {
    let (app, _dir) = test_app();

    // first registration bootstraps the superadmin
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth",
        Some(json!({"action": "register", "email": "root@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, login) = send(
        &app,
        "POST",
        "/api/v1/auth",
        Some(json!({"action": "login", "email": "root@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["role"], json!("superadmin"));
    let token = login["token"].as_str().unwrap().to_string();

    let (status, verified) =
        send(&app, "POST", "/api/v1/auth", Some(json!({"action": "verify", "token": token}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["claims"]["email"], json!("root@example.com"));

    // second registration waits in the pending queue
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth",
        Some(json!({"action": "register", "email": "staff@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, pending) = send(
        &app,
        "POST",
        "/api/v1/auth",
        Some(json!({"action": "getPendingUsers", "token": token})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pending_id = pending["pendingUsers"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth",
        Some(json!({"action": "approve", "token": token, "id": pending_id, "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, login) = send(
        &app,
        "POST",
        "/api/v1/auth",
        Some(json!({"action": "login", "email": "staff@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["role"], json!("admin"));

    // the fresh admin token cannot approve
    let staff_token = login["token"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth",
        Some(json!({"action": "getPendingUsers", "token": staff_token})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_before_approval_unauthorized() {
    let (app, _dir) = test_app();
    for email in ["root@example.com", "staff@example.com"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/auth",
            Some(json!({"action": "register", "email": email, "password": "password123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth",
        Some(json!({"action": "login", "email": "staff@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("approval"));
}

#[tokio::test]
async fn test_settings_replace_round_trip() {
    let (app, _dir) = test_app();

    // seeded default on first read
    let (status, defaults) = send(&app, "GET", "/api/v1/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(defaults["currency"], json!("USD"));

    let replacement = json!({
        "storeName": "Hill Street Apparel",
        "currency": "BDT",
        "supportEmail": "help@hillstreet.example",
        "courierEnabled": true,
        "notifyOnOrder": false,
        "lowStockThreshold": 3
    });
    let (status, _) = send(&app, "PUT", "/api/v1/settings", Some(replacement.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (_, loaded) = send(&app, "GET", "/api/v1/settings", None).await;
    assert_eq!(loaded, replacement);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let (app, _dir) = test_app();
    seed_product(&app, "P1", 100).await;
    let first = seed_order(&app, "P1", 1).await;
    seed_order(&app, "P1", 2).await;
    let (status, _) =
        send(&app, "PUT", &format!("/api/v1/orders/{first}"), Some(json!({"status": "cancelled"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, stats) = send(&app, "GET", "/api/v1/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalOrders"], json!(2));
    assert_eq!(stats["processingOrders"], json!(1));
    assert_eq!(stats["cancelledOrders"], json!(1));
    assert_eq!(stats["totalRevenue"], json!(20.0));
}

#[tokio::test]
async fn test_courier_unconfigured_is_bad_request() {
    let (app, _dir) = test_app();
    let (status, body) =
        send(&app, "POST", "/api/v1/courier/send", Some(json!({"orderId": "AN1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("courier"));
}

#[tokio::test]
async fn test_category_crud_and_duplicate_rejected() {
    let (app, _dir) = test_app();
    let (status, created) =
        send(&app, "POST", "/api/v1/categories", Some(json!({"name": "Summer Shirts"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], json!("summer-shirts"));

    let (status, _) =
        send(&app, "POST", "/api/v1/categories", Some(json!({"name": "summer shirts"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = created["id"].as_str().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/api/v1/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/api/v1/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customer_crud() {
    let (app, _dir) = test_app();
    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/customers",
        Some(json!({"name": "Jane", "email": "jane@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/v1/customers/{id}"),
        Some(json!({"phone": "555-0101"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], json!("555-0101"));
    assert_eq!(updated["name"], json!("Jane"));

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, remaining) = send(&app, "GET", "/api/v1/customers", None).await;
    assert!(remaining.as_array().unwrap().is_empty());
}
