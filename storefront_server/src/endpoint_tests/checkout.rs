use actix_web::{http::StatusCode, web::ServiceConfig};
use serde_json::json;

use super::helpers::{json, post_request};
use crate::routes::checkout_metadata;

fn configure(cfg: &mut ServiceConfig) {
    cfg.service(checkout_metadata);
}

#[actix_web::test]
async fn metadata_carries_ids_and_quantities_only() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "userId": "u1",
        "addressId": "a1",
        "items": [
            { "product": { "id": "p1", "name": "Keyboard", "price": 1 }, "quantity": 2 },
            { "product": { "id": "p2" }, "quantity": 1 }
        ]
    })
    .to_string();
    let (status, body) = post_request(&[], "/api/checkout/metadata", &body, configure).await;
    assert_eq!(status, StatusCode::OK);
    let metadata = json(&body);
    assert_eq!(metadata["buyerId"], "u1");
    assert_eq!(metadata["addressId"], "a1");
    let cart: serde_json::Value = serde_json::from_str(metadata["cartItems"].as_str().unwrap()).unwrap();
    assert_eq!(cart, json!([{"productId": "p1", "quantity": 2}, {"productId": "p2", "quantity": 1}]));
}

#[actix_web::test]
async fn metadata_needs_an_address() {
    let _ = env_logger::try_init().ok();
    let body = json!({"buyerId": "u1", "items": [{ "product": { "id": "p1" }, "quantity": 2 }]}).to_string();
    let (status, body) = post_request(&[], "/api/checkout/metadata", &body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().contains("Missing parameters"));
}

#[actix_web::test]
async fn metadata_rejects_zero_quantities() {
    let _ = env_logger::try_init().ok();
    let body =
        json!({"buyerId": "u1", "addressId": "a1", "items": [{ "product": { "id": "p1" }, "quantity": 0 }]}).to_string();
    let (status, _) = post_request(&[], "/api/checkout/metadata", &body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
