//! End-to-end tests for the payment routes.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! payment gateway is a recording double and purchases live in memory.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use class_pay::gateway::{build_router, state::AppState};
use class_pay::purchases::StoreError;
use class_pay::razorpay::{CreateOrderRequest, GatewayError, Order, OrderGateway};
use class_pay::signature::payment_signature;
use class_pay::user_auth::Claims;
use class_pay::{CheckoutService, Currency, IdentityVerifier, MemoryPurchaseStore, PurchaseStore};

const KEY_SECRET: &str = "s3cr3t";
const AUTH_SECRET: &str = "identity_provider_secret";

#[derive(Debug, Default)]
struct FakeGateway {
    requests: Mutex<Vec<CreateOrderRequest>>,
    fail: bool,
}

#[async_trait]
impl OrderGateway for FakeGateway {
    async fn create_order(&self, req: &CreateOrderRequest) -> Result<Order, GatewayError> {
        self.requests.lock().unwrap().push(req.clone());
        if self.fail {
            return Err(GatewayError::Upstream {
                status: 400,
                body: "BAD_REQUEST_ERROR: key_secret rzp_live_xxx is invalid".to_string(),
            });
        }
        Ok(Order {
            id: format!("order_{}", self.requests.lock().unwrap().len()),
            amount: req.amount,
            currency: req.currency.clone(),
            receipt: Some(req.receipt.clone()),
            status: Some("created".to_string()),
        })
    }
}

/// Store whose every call hangs past any sane timeout.
#[derive(Debug, Default)]
struct StalledStore;

#[async_trait]
impl PurchaseStore for StalledStore {
    async fn grant(&self, _user_id: &str, _item_id: &str) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }

    async fn purchased_items(&self, _user_id: &str) -> Result<Vec<String>, StoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

fn router_with_store(store: Arc<dyn PurchaseStore>, store_timeout: Duration) -> Router {
    let checkout = CheckoutService::new(
        Arc::new(FakeGateway::default()),
        store,
        SecretString::from(KEY_SECRET),
        Currency::default(),
        "receipt_",
        store_timeout,
    );
    let identity = IdentityVerifier::new(SecretString::from(AUTH_SECRET));
    build_router(Arc::new(AppState::new(Arc::new(checkout), Arc::new(identity))))
}

struct TestApp {
    router: Router,
    gateway: Arc<FakeGateway>,
    store: Arc<MemoryPurchaseStore>,
}

fn app_with(gateway: FakeGateway) -> TestApp {
    let gateway = Arc::new(gateway);
    let store = Arc::new(MemoryPurchaseStore::new());
    let checkout = CheckoutService::new(
        gateway.clone(),
        store.clone(),
        SecretString::from(KEY_SECRET),
        Currency::default(),
        "receipt_",
        Duration::from_secs(10),
    );
    let identity = IdentityVerifier::new(SecretString::from(AUTH_SECRET));
    let state = Arc::new(AppState::new(Arc::new(checkout), Arc::new(identity)));

    TestApp {
        router: build_router(state),
        gateway,
        store,
    }
}

fn app() -> TestApp {
    app_with(FakeGateway::default())
}

fn bearer(uid: &str) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: uid.to_string(),
        exp: now + 3600,
        iat: now,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(AUTH_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

fn sign(order_id: &str, payment_id: &str) -> String {
    payment_signature(&SecretString::from(KEY_SECRET), order_id, payment_id)
}

async fn post(router: &Router, path: &str, auth: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        req = req.header(header::AUTHORIZATION, auth);
    }
    let resp = router
        .clone()
        .oneshot(req.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn verify_body(order_id: &str, payment_id: &str, signature: &str, item_id: &str) -> String {
    json!({
        "orderId": order_id,
        "paymentId": payment_id,
        "signature": signature,
        "itemId": item_id,
    })
    .to_string()
}

// ============================================================================
// createOrder
// ============================================================================

#[tokio::test]
async fn create_order_returns_order_id() {
    let app = app();

    let (status, body) = post(&app.router, "/api/v1/createOrder", None, r#"{"amount": 499}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["orderId"], "order_1");

    let requests = app.gateway.requests.lock().unwrap();
    assert_eq!(requests[0].amount, 49_900);
    assert_eq!(requests[0].currency, "INR");
    assert!(requests[0].receipt.starts_with("receipt_"));
}

#[tokio::test]
async fn create_order_fractional_amount() {
    let app = app();

    let (status, _) = post(&app.router, "/api/v1/createOrder", None, r#"{"amount": 19.99}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.gateway.requests.lock().unwrap()[0].amount, 1999);
}

#[tokio::test]
async fn create_order_rejects_bad_amounts() {
    let app = app();

    for body in [
        r#"{"amount": 0}"#,
        r#"{"amount": -100}"#,
        r#"{"amount": "100"}"#,
        r#"{"amount": null}"#,
        r#"{}"#,
        r#"not json"#,
    ] {
        let (status, resp) = post(&app.router, "/api/v1/createOrder", None, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(resp["status"], "INVALID_ARGUMENT", "{body}");
    }
    assert!(app.gateway.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_order_upstream_failure_not_leaked() {
    let app = app_with(FakeGateway {
        fail: true,
        ..Default::default()
    });

    let (status, body) = post(&app.router, "/api/v1/createOrder", None, r#"{"amount": 10}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "INTERNAL");
    assert_eq!(body["message"], "Could not create order.");
    assert!(!body.to_string().contains("rzp_live"));
}

// ============================================================================
// verifyPayment
// ============================================================================

#[tokio::test]
async fn verify_payment_grants_item() {
    let app = app();
    let auth = bearer("uid_alice");
    let body = verify_body("order_abc", "pay_123", &sign("order_abc", "pay_123"), "class_rust");

    let (status, resp) = post(&app.router, "/api/v1/verifyPayment", Some(&auth), &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["message"], "Payment verified and access granted!");
    assert_eq!(
        app.store.purchased_items("uid_alice").await.unwrap(),
        vec!["class_rust"]
    );
}

#[tokio::test]
async fn verify_payment_accepts_class_id_alias() {
    let app = app();
    let auth = bearer("uid_alice");
    let body = json!({
        "orderId": "order_abc",
        "paymentId": "pay_123",
        "signature": sign("order_abc", "pay_123"),
        "classId": "class_go",
    })
    .to_string();

    let (status, _) = post(&app.router, "/api/v1/verifyPayment", Some(&auth), &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.store.purchased_items("uid_alice").await.unwrap(),
        vec!["class_go"]
    );
}

#[tokio::test]
async fn verify_payment_without_identity() {
    let app = app();
    let body = verify_body("order_abc", "pay_123", &sign("order_abc", "pay_123"), "class_rust");

    for auth in [None, Some("Bearer not-a-jwt"), Some("Basic dXNlcjpwYXNz")] {
        let (status, resp) = post(&app.router, "/api/v1/verifyPayment", auth, &body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp["status"], "UNAUTHENTICATED");
    }
    assert!(app.store.purchased_items("uid_alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn verify_payment_tampered_signature() {
    let app = app();
    let auth = bearer("uid_alice");
    let forged = "f".repeat(64);
    let body = verify_body("order_abc", "pay_123", &forged, "class_rust");

    let (status, resp) = post(&app.router, "/api/v1/verifyPayment", Some(&auth), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["status"], "INVALID_ARGUMENT");
    assert_eq!(resp["message"], "Payment signature does not match.");
    assert!(app.store.purchased_items("uid_alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn verify_payment_missing_field() {
    let app = app();
    let auth = bearer("uid_alice");
    let body = json!({
        "orderId": "order_abc",
        "paymentId": "pay_123",
        "signature": sign("order_abc", "pay_123"),
    })
    .to_string();

    let (status, resp) = post(&app.router, "/api/v1/verifyPayment", Some(&auth), &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Missing required field: itemId");
}

#[tokio::test]
async fn verify_payment_twice_is_idempotent() {
    let app = app();
    let auth = bearer("uid_alice");
    let body = verify_body("order_abc", "pay_123", &sign("order_abc", "pay_123"), "class_rust");

    for _ in 0..2 {
        let (status, _) = post(&app.router, "/api/v1/verifyPayment", Some(&auth), &body).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(
        app.store.purchased_items("uid_alice").await.unwrap(),
        vec!["class_rust"]
    );
}

#[tokio::test]
async fn verify_payment_concurrent_items() {
    let app = app();
    let auth = bearer("uid_alice");

    let tasks: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|tag| {
            let router = app.router.clone();
            let auth = auth.clone();
            let order_id = format!("order_{tag}");
            let payment_id = format!("pay_{tag}");
            let body = verify_body(
                &order_id,
                &payment_id,
                &sign(&order_id, &payment_id),
                &format!("class_{tag}"),
            );
            tokio::spawn(async move {
                post(&router, "/api/v1/verifyPayment", Some(&auth), &body)
                    .await
                    .0
            })
        })
        .collect();

    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(
        app.store.purchased_items("uid_alice").await.unwrap(),
        vec!["class_a", "class_b", "class_c", "class_d"]
    );
}

// ============================================================================
// purchases / health
// ============================================================================

#[tokio::test]
async fn purchases_lists_caller_items_only() {
    let app = app();
    app.store.grant("uid_alice", "class_rust").await.unwrap();
    app.store.grant("uid_bob", "class_go").await.unwrap();

    let req = Request::builder()
        .uri("/api/v1/purchases")
        .header(header::AUTHORIZATION, bearer("uid_alice"))
        .body(Body::empty())
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["items"], json!(["class_rust"]));
}

#[tokio::test]
async fn health_check_ok() {
    let app = app();

    let req = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_check_stalled_store_is_unavailable() {
    let router = router_with_store(Arc::new(StalledStore), Duration::from_millis(100));

    let req = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();
    let resp = tokio::time::timeout(Duration::from_secs(5), router.oneshot(req))
        .await
        .expect("health check must not hang")
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 5001);
}

#[tokio::test]
async fn openapi_document_lists_payment_routes() {
    let app = app();

    let req = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    for path in [
        "/api/v1/health",
        "/api/v1/createOrder",
        "/api/v1/verifyPayment",
        "/api/v1/purchases",
    ] {
        assert!(doc["paths"].get(path).is_some(), "{path}");
    }
}
