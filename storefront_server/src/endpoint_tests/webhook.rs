use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{Duration, Utc};
use serde_json::json;
use storefront_common::Secret;
use storefront_engine::{
    db_types::{InsertOrderResult, OrderStatusType},
    events::EventProducers,
    helpers::WebhookVerifier,
    FulfillmentApi,
};

use super::{
    helpers::{json, post_request},
    mocks::{address, order, order_item, product, MockStore},
};
use crate::{
    middleware::{SignatureMiddlewareFactory, SIGNATURE_HEADER},
    webhook_routes::CheckoutWebhookRoute,
};

const SECRET: &str = "whsec_endpoint_tests";

fn verifier() -> WebhookVerifier {
    WebhookVerifier::new(Secret::new(SECRET.to_string()), Duration::seconds(300))
}

fn completion_payload(address_id: &str) -> String {
    json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "amount_total": 15000,
                "metadata": {
                    "buyerId": "u1",
                    "addressId": address_id,
                    "cartItems": "[{\"productId\":\"p1\",\"quantity\":2}]"
                }
            }
        }
    })
    .to_string()
}

fn sign_now(payload: &str) -> String {
    verifier().sign(payload.as_bytes(), Utc::now().timestamp())
}

async fn deliver(payload: &str, signature: Option<&str>, store: MockStore) -> (StatusCode, String) {
    let headers = signature.map(|s| vec![(SIGNATURE_HEADER, s)]).unwrap_or_default();
    post_request(&headers, "/webhook/checkout", payload, configure(store, true)).await
}

fn configure(store: MockStore, signature_checks: bool) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = FulfillmentApi::new(store, EventProducers::default());
        cfg.app_data(web::Data::new(api)).service(
            web::scope("/webhook")
                .wrap(SignatureMiddlewareFactory::new(SIGNATURE_HEADER, verifier(), signature_checks))
                .service(CheckoutWebhookRoute::<MockStore>::new()),
        );
    }
}

fn happy_path_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_fetch_order_by_session_id().times(1).returning(|_| Ok(None));
    store.expect_fetch_address().times(1).returning(|_| Ok(Some(address())));
    store.expect_fetch_products().times(1).returning(|_| Ok(vec![product()]));
    store.expect_insert_order().times(1).returning(|new_order| {
        assert_eq!(new_order.session_id.as_str(), "cs_test_1");
        assert_eq!(new_order.items.len(), 1);
        assert_eq!(new_order.items[0].quantity, 2);
        Ok(InsertOrderResult::Inserted(order(1, OrderStatusType::Preparing), vec![order_item(1)]))
    });
    store.expect_decrement_stock().times(1).returning(|_, _| Ok(8));
    store.expect_clear_cart().times(1).returning(|_| Ok(1));
    store
}

#[actix_web::test]
async fn signed_completion_creates_order() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a1");
    let signature = sign_now(&payload);
    let (status, body) = deliver(&payload, Some(&signature), happy_path_store()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"received": true}));
}

#[actix_web::test]
async fn missing_signature_header() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a1");
    let (status, body) = deliver(&payload, None, MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Webhook signature is invalid."));
}

#[actix_web::test]
async fn tampered_body_is_rejected() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a1");
    let signature = sign_now(&payload);
    let tampered = payload.replace("15000", "1");
    let (status, _) = deliver(&tampered, Some(&signature), MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn stale_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a1");
    let signature = verifier().sign(payload.as_bytes(), Utc::now().timestamp() - 3600);
    let (status, _) = deliver(&payload, Some(&signature), MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn out_of_range_timestamp_is_rejected() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a1");
    for signature in ["t=-9223372036854775808,v1=00", "t=9223372036854775807,v1=00"] {
        let (status, body) = deliver(&payload, Some(signature), MockStore::new()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&body)["error"].as_str().unwrap().contains("tolerance"));
    }
}

#[actix_web::test]
async fn signature_from_another_secret_is_rejected() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a1");
    let other = WebhookVerifier::new(Secret::new("whsec_someone_else".to_string()), Duration::seconds(300));
    let signature = other.sign(payload.as_bytes(), Utc::now().timestamp());
    let (status, _) = deliver(&payload, Some(&signature), MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_payload_is_not_retried() {
    let _ = env_logger::try_init().ok();
    let payload = json!({
        "type": "checkout.session.completed",
        "data": { "object": { "id": "cs_test_1", "amount_total": 15000, "metadata": { "buyerId": "u1" } } }
    })
    .to_string();
    let signature = sign_now(&payload);
    let (status, body) = deliver(&payload, Some(&signature), MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().contains("addressId"));
}

#[actix_web::test]
async fn oversized_quantity_is_not_retried() {
    let _ = env_logger::try_init().ok();
    let payload = json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "amount_total": 15000,
                "metadata": {
                    "buyerId": "u1",
                    "addressId": "a1",
                    "cartItems": format!("[{{\"productId\":\"p1\",\"quantity\":{}}}]", i64::MAX / 2)
                }
            }
        }
    })
    .to_string();
    let signature = sign_now(&payload);
    let (status, body) = deliver(&payload, Some(&signature), MockStore::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().contains("cartItems"));
}

#[actix_web::test]
async fn missing_address_is_retried() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a404");
    let signature = sign_now(&payload);
    let mut store = MockStore::new();
    store.expect_fetch_order_by_session_id().returning(|_| Ok(None));
    store.expect_fetch_address().times(1).returning(|_| Ok(None));
    store.expect_insert_order().never();
    let (status, body) = deliver(&payload, Some(&signature), store).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json(&body)["error"].as_str().unwrap().contains("a404"));
}

#[actix_web::test]
async fn redelivery_is_acknowledged_without_writes() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a1");
    let signature = sign_now(&payload);
    let mut store = MockStore::new();
    store.expect_fetch_order_by_session_id().times(1).returning(|_| Ok(Some(order(1, OrderStatusType::Shipped))));
    store.expect_insert_order().never();
    store.expect_decrement_stock().never();
    store.expect_clear_cart().never();
    let (status, body) = deliver(&payload, Some(&signature), store).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"received": true}));
}

#[actix_web::test]
async fn other_event_types_are_acknowledged() {
    let _ = env_logger::try_init().ok();
    let payload = json!({"id": "evt_2", "type": "checkout.session.expired", "data": {"object": {}}}).to_string();
    let signature = sign_now(&payload);
    let (status, body) = deliver(&payload, Some(&signature), MockStore::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"received": true}));
}

#[actix_web::test]
async fn database_outage_is_retried() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a1");
    let signature = sign_now(&payload);
    let mut store = MockStore::new();
    store
        .expect_fetch_order_by_session_id()
        .returning(|_| Err(storefront_engine::StoreError::DatabaseError("connection refused".into())));
    let (status, _) = deliver(&payload, Some(&signature), store).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn disabled_signature_checks_let_unsigned_requests_through() {
    let _ = env_logger::try_init().ok();
    let payload = completion_payload("a1");
    let (status, _) = post_request(&[], "/webhook/checkout", &payload, configure(happy_path_store(), false)).await;
    assert_eq!(status, StatusCode::OK);
}
