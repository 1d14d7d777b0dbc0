//! Router-level tests against the in-memory store

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use order_server::auth::{Principal, Role, create_token};
use order_server::db::memory::Seed;
use order_server::db::{MemoryStore, Store};
use order_server::{AppState, api};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "test-secret";
const PASSWORD: &str = "correct horse";

fn seed() -> Seed {
    serde_json::from_value(json!({
        "customers": [{
            "id": 100, "email": "Ada@Example.com", "phone": "+15550100",
            "first_name": "Ada", "last_name": "Lovelace", "address": "1 Main St",
            "verified": false, "lat": 0.0, "lng": 0.0, "password": PASSWORD
        }],
        "vendors": [
            {
                "id": 200, "name": "Curry House", "owner_name": "Ravi",
                "email": "curry@example.com", "phone": "", "address": "",
                "zone": "700000", "lat": 0.0, "lng": 0.0,
                "service_available": true, "rating": 4.5, "password": PASSWORD
            },
            {
                "id": 201, "name": "Noodle Bar", "owner_name": "Mei",
                "email": "noodle@example.com", "phone": "", "address": "",
                "zone": "800000", "lat": 9.0, "lng": 9.0,
                "service_available": true, "rating": 4.0, "password": PASSWORD
            }
        ],
        "shippers": [
            {
                "id": 300, "email": "near@example.com", "phone": "",
                "first_name": "Near", "last_name": "Rider", "address": "",
                "zone": "700000", "verified": true, "is_available": true,
                "lat": 1.0, "lng": 1.0, "password": PASSWORD
            },
            {
                "id": 301, "email": "far@example.com", "phone": "",
                "first_name": "Far", "last_name": "Rider", "address": "",
                "zone": "700000", "verified": true, "is_available": true,
                "lat": 3.0, "lng": 3.0
            }
        ],
        "foods": [
            {
                "id": 1, "vendor_id": 200, "name": "Dal", "description": "",
                "category": "main", "food_type": "veg", "ready_time_minutes": 20,
                "price": 10.0, "rating": 4.0
            },
            {
                "id": 2, "vendor_id": 201, "name": "Ramen", "description": "",
                "category": "main", "food_type": "non-veg", "ready_time_minutes": 15,
                "price": 12.5, "rating": 4.0
            }
        ],
        "promos": [
            {
                "id": 10, "code": "FIVEOFF", "title": "Five off", "description": "",
                "scope": "GENERIC", "requirement": "NONE", "minimum_order_value": 0.0,
                "discount_amount": 5.0, "zone": "700000", "active": true
            },
            {
                "id": 11, "code": "OLD", "title": "Expired", "description": "",
                "scope": "GENERIC", "requirement": "NONE", "minimum_order_value": 0.0,
                "discount_amount": 5.0, "zone": "700000", "active": false
            }
        ]
    }))
    .unwrap()
}

async fn setup() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    store.load_seed(seed()).await.unwrap();
    let state = AppState::with_store(Arc::new(store.clone()), SECRET);
    (api::create_router(state), store)
}

fn token(id: i64, role: Role) -> String {
    let principal = Principal {
        id,
        role,
        email: format!("{id}@example.com"),
        verified: true,
    };
    create_token(&principal, SECRET, 1).unwrap()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, role: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/{role}/login"),
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_errors() {
    let (app, _) = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/customer/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/shipper/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3003);

    let (status, body) = send(
        &app,
        Method::POST,
        "/vendor/login",
        None,
        Some(json!({ "email": "not-an-email", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn test_auth_is_enforced() {
    let (app, _) = setup().await;

    let (status, body) = send(&app, Method::GET, "/customer/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let vendor = token(200, Role::Vendor);
    let (status, body) = send(&app, Method::GET, "/customer/cart", Some(&vendor), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, body) = send(&app, Method::GET, "/admin/shippers", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_otp_verification() {
    let (app, store) = setup().await;
    let customer = login(&app, "customer", "ada@example.com").await;

    let (status, body) = send(&app, Method::GET, "/customer/otp", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["expires_at"].is_i64());
    assert!(body.get("code").is_none());

    let issued = store.find_customer(100).await.unwrap().unwrap().otp.unwrap();
    let wrong = if issued == "111111" { "222222" } else { "111111" };

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/customer/verify",
        Some(&customer),
        Some(json!({ "code": wrong })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 3014);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/customer/verify",
        Some(&customer),
        Some(json!({ "code": issued })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], true);
    assert!(body["token"].is_string());

    let (status, body) = send(&app, Method::GET, "/customer/otp", Some(&customer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3004);
}

#[tokio::test]
async fn test_cart_to_delivered_order() {
    let (app, _) = setup().await;
    let customer = login(&app, "customer", "ada@example.com").await;

    // Cart: food 1 (10.00) x 3
    let (status, body) = send(
        &app,
        Method::POST,
        "/customer/cart",
        Some(&customer),
        Some(json!({ "food_id": 1, "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "food_id": 1, "quantity": 3 }]));

    // Transaction with the five-off promo
    let (status, txn) = send(
        &app,
        Method::POST,
        "/customer/transaction",
        Some(&customer),
        Some(json!({ "total_amount": 30.0, "payment_mode": "COD", "promo_id": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(txn["status"], "OPEN");
    assert_eq!(txn["order_amount"].as_f64(), Some(25.0));
    assert_eq!(txn["payment_note"], "Payment is cash on delivery");
    let txn_id = txn["id"].as_i64().unwrap();

    // Order from the stored cart
    let (status, order) = send(
        &app,
        Method::POST,
        "/customer/order",
        Some(&customer),
        Some(json!({ "transaction_id": txn_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["total_amount"].as_f64(), Some(30.0));
    assert_eq!(order["final_amount"].as_f64(), Some(25.0));
    assert_eq!(order["delivery_id"], 300);
    assert_eq!(order["vendor_id"], 200);
    let order_id = order["id"].as_i64().unwrap();

    let (_, cart) = send(&app, Method::GET, "/customer/cart", Some(&customer), None).await;
    assert_eq!(cart, json!([]));

    // Spent transaction cannot be reused
    let (status, body) = send(
        &app,
        Method::POST,
        "/customer/order",
        Some(&customer),
        Some(json!({ "transaction_id": txn_id, "items": [{ "food_id": 1, "quantity": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5102);

    let (_, orders) = send(&app, Method::GET, "/customer/orders", Some(&customer), None).await;
    assert_eq!(orders.as_array().map(Vec::len), Some(1));
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/customer/order/{order_id}"),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Vendor lifecycle
    let vendor = login(&app, "vendor", "curry@example.com").await;
    let process = |status: &str| json!({ "status": status, "ready_time_minutes": 25 });
    let uri = format!("/vendor/order/{order_id}/process");

    let (status, body) = send(&app, Method::PUT, &uri, Some(&vendor), Some(process("READY"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4008);

    for next in ["ACCEPTED", "IN_PROGRESS", "READY", "DELIVERED"] {
        let (status, body) =
            send(&app, Method::PUT, &uri, Some(&vendor), Some(process(next))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["status"], next);
        assert_eq!(body["ready_time_minutes"], 25);
    }

    // Another vendor cannot see it
    let other = login(&app, "vendor", "noodle@example.com").await;
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/vendor/order/{order_id}"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    // Admin sees the consumed transaction with its order attached
    let admin = token(1, Role::Admin);
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/admin/transaction/{txn_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["order_id"], order_id);
}

#[tokio::test]
async fn test_empty_and_unmatched_orders_leave_transaction_open() {
    let (app, store) = setup().await;
    let customer = token(100, Role::Customer);

    let (_, txn) = send(
        &app,
        Method::POST,
        "/customer/transaction",
        Some(&customer),
        Some(json!({ "total_amount": 12.5, "payment_mode": "CARD" })),
    )
    .await;
    let txn_id = txn["id"].as_i64().unwrap();

    // Empty cart
    let (status, body) = send(
        &app,
        Method::POST,
        "/customer/order",
        Some(&customer),
        Some(json!({ "transaction_id": txn_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4007);

    // Food from a vendor whose zone has no shippers
    let (status, body) = send(
        &app,
        Method::POST,
        "/customer/order",
        Some(&customer),
        Some(json!({ "transaction_id": txn_id, "items": [{ "food_id": 2, "quantity": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 7001);

    let txn = store.find_transaction(txn_id).await.unwrap().unwrap();
    assert!(txn.is_open());
    assert!(store.orders_for_customer(100).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_promo_and_transaction_errors() {
    let (app, _) = setup().await;
    let customer = token(100, Role::Customer);

    let (status, body) =
        send(&app, Method::GET, "/customer/promo/verify/10", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "FIVEOFF");

    let (status, body) =
        send(&app, Method::GET, "/customer/promo/verify/11", Some(&customer), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5202);

    let (status, body) = send(
        &app,
        Method::POST,
        "/customer/transaction",
        Some(&customer),
        Some(json!({ "total_amount": 20.0, "payment_mode": "CARD", "promo_id": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5201);

    let (status, body) = send(
        &app,
        Method::POST,
        "/customer/transaction",
        Some(&customer),
        Some(json!({ "total_amount": -1.0, "payment_mode": "CARD" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5103);

    let (status, body) = send(
        &app,
        Method::POST,
        "/customer/cart",
        Some(&customer),
        Some(json!({ "food_id": 404, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_shipper_status_and_admin_verification() {
    let (app, _) = setup().await;
    let shipper = login(&app, "shipper", "near@example.com").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/shipper/change-status",
        Some(&shipper),
        Some(json!({ "lat": 2.0, "lng": 2.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_available"], false);
    assert_eq!(body["lat"].as_f64(), Some(2.0));
    assert!(body.get("password_hash").is_none());

    let admin = token(1, Role::Admin);
    let (status, body) = send(
        &app,
        Method::PUT,
        "/admin/shipper/verify",
        Some(&admin),
        Some(json!({ "shipper_id": 301, "verified": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verified"], false);

    let (_, list) = send(&app, Method::GET, "/admin/shippers", Some(&admin), None).await;
    assert_eq!(list.as_array().map(Vec::len), Some(2));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/admin/shipper/verify",
        Some(&admin),
        Some(json!({ "shipper_id": 999, "verified": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3003);
}

#[tokio::test]
async fn test_mixed_case_seed_email_logs_in() {
    let (app, _) = setup().await;
    for typed in ["ada@example.com", "Ada@Example.com", "ADA@EXAMPLE.COM"] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/customer/login",
            None,
            Some(json!({ "email": typed, "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{typed}: {body}");
        assert_eq!(body["email"], "ada@example.com");
    }
}

#[tokio::test]
async fn test_vendor_service_toggle() {
    let (app, store) = setup().await;
    let vendor = login(&app, "vendor", "curry@example.com").await;

    let (status, body) = send(&app, Method::PATCH, "/vendor/service", Some(&vendor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service_available"], false);
    assert!(body.get("password_hash").is_none());
    let stored = store.find_vendor(200).await.unwrap().unwrap();
    assert!(!stored.service_available);

    let (_, body) = send(&app, Method::PATCH, "/vendor/service", Some(&vendor), None).await;
    assert_eq!(body["service_available"], true);

    let customer = token(100, Role::Customer);
    let (status, _) = send(&app, Method::PATCH, "/vendor/service", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_vendor_promo_management() {
    let (app, store) = setup().await;
    let curry = login(&app, "vendor", "curry@example.com").await;
    let noodle = login(&app, "vendor", "noodle@example.com").await;
    let body = json!({
        "code": "CURRY3", "title": "Three off curry", "scope": "VENDOR",
        "requirement": "NONE", "discount_amount": 3.0, "zone": "700000"
    });

    let (status, created) =
        send(&app, Method::POST, "/vendor/promo", Some(&curry), Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["vendor_ids"], json!([200]));
    assert_eq!(created["active"], true);
    let promo_id = created["id"].as_i64().unwrap();

    // Generic promos plus the vendor's own
    let ids = |list: &Value| -> Vec<i64> {
        list.as_array().unwrap().iter().filter_map(|p| p["id"].as_i64()).collect()
    };
    let (_, list) = send(&app, Method::GET, "/vendor/promos", Some(&curry), None).await;
    assert_eq!(ids(&list), vec![10, 11, promo_id]);
    let (_, list) = send(&app, Method::GET, "/vendor/promos", Some(&noodle), None).await;
    assert_eq!(ids(&list), vec![10, 11]);

    let mut update = body.clone();
    update["code"] = json!("CURRY4");
    update["discount_amount"] = json!(4.0);
    update["active"] = json!(false);
    let uri = format!("/vendor/promo/{promo_id}");
    let (status, updated) = send(&app, Method::PUT, &uri, Some(&curry), Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["code"], "CURRY4");
    assert_eq!(updated["active"], false);
    assert!(!store.find_promo(promo_id).await.unwrap().unwrap().active);

    let (status, err) = send(&app, Method::PUT, &uri, Some(&noodle), Some(update.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 5201);
    let (status, err) =
        send(&app, Method::PUT, "/vendor/promo/999", Some(&curry), Some(update)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], 5201);

    let mut negative = body;
    negative["discount_amount"] = json!(-1.0);
    let (status, err) =
        send(&app, Method::POST, "/vendor/promo", Some(&curry), Some(negative)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 5103);
}
