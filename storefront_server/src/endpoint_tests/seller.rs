use actix_web::{http::StatusCode, web, web::ServiceConfig};
use serde_json::json;
use storefront_common::Secret;
use storefront_engine::{
    db_types::{Money, OrderStatusType, SellerOrder, SellerOrderItem},
    events::EventProducers,
    SellerApi,
};

use super::{
    helpers::{get_request, json, post_request},
    mocks::{order, MockStore},
};
use crate::{
    middleware::{SellerKeyMiddlewareFactory, SELLER_KEY_HEADER},
    routes::{SellerOrdersRoute, UpdateOrderStatusRoute},
};

const SELLER_KEY: &str = "seller-secret";

fn configure(store: MockStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = SellerApi::new(store, EventProducers::default());
        cfg.app_data(web::Data::new(api)).service(
            web::scope("/api/seller")
                .wrap(SellerKeyMiddlewareFactory::new(Secret::new(SELLER_KEY.to_string())))
                .service(SellerOrdersRoute::<MockStore>::new())
                .service(UpdateOrderStatusRoute::<MockStore>::new()),
        );
    }
}

fn seller_orders() -> Vec<SellerOrder> {
    vec![SellerOrder {
        order: order(1, OrderStatusType::Preparing),
        items: vec![SellerOrderItem {
            id: 1,
            order_id: 1,
            product_id: "p1".into(),
            product_name: Some("Mechanical keyboard".into()),
            quantity: 2,
            price: Money::from(7500),
        }],
    }]
}

#[actix_web::test]
async fn orders_need_a_seller_key() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_orders_with_items().never();
    let (status, body) = get_request(&[], "/api/seller/orders", configure(store)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Insufficient Permissions."));
}

#[actix_web::test]
async fn orders_with_wrong_seller_key() {
    let _ = env_logger::try_init().ok();
    let headers = [(SELLER_KEY_HEADER, "guess")];
    let (status, _) = get_request(&headers, "/api/seller/orders", configure(MockStore::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn list_orders() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_orders_with_items().times(1).returning(|| Ok(seller_orders()));
    let headers = [(SELLER_KEY_HEADER, SELLER_KEY)];
    let (status, body) = get_request(&headers, "/api/seller/orders", configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    let orders = json(&body);
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["session_id"], "cs_test_1");
    assert_eq!(orders[0]["status"], "Preparing");
    assert_eq!(orders[0]["address"]["city"], "Arlington");
    assert_eq!(orders[0]["items"][0]["product_name"], "Mechanical keyboard");
    assert_eq!(orders[0]["items"][0]["quantity"], 2);
}

#[actix_web::test]
async fn update_status() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order_by_id().times(1).returning(|id| Ok(Some(order(id, OrderStatusType::Preparing))));
    store.expect_update_order_status().times(1).returning(|id, status| Ok(order(id, status)));
    let headers = [(SELLER_KEY_HEADER, SELLER_KEY)];
    let body = json!({"status": "Shipped"}).to_string();
    let (status, body) = post_request(&headers, "/api/seller/orders/1/status", &body, configure(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "Shipped");
}

#[actix_web::test]
async fn update_status_of_unknown_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order_by_id().times(1).returning(|_| Ok(None));
    store.expect_update_order_status().never();
    let headers = [(SELLER_KEY_HEADER, SELLER_KEY)];
    let body = json!({"status": "Shipped"}).to_string();
    let (status, _) = post_request(&headers, "/api/seller/orders/42/status", &body, configure(store)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_to_same_status() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order_by_id().times(1).returning(|id| Ok(Some(order(id, OrderStatusType::Shipped))));
    store.expect_update_order_status().never();
    let headers = [(SELLER_KEY_HEADER, SELLER_KEY)];
    let body = json!({"status": "Shipped"}).to_string();
    let (status, _) = post_request(&headers, "/api/seller/orders/1/status", &body, configure(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_to_unknown_status() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_fetch_order_by_id().never();
    let headers = [(SELLER_KEY_HEADER, SELLER_KEY)];
    let body = json!({"status": "Lost"}).to_string();
    let (status, body) = post_request(&headers, "/api/seller/orders/1/status", &body, configure(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Could not read request body"));
}

#[actix_web::test]
async fn non_numeric_order_id() {
    let _ = env_logger::try_init().ok();
    let headers = [(SELLER_KEY_HEADER, SELLER_KEY)];
    let body = json!({"status": "Shipped"}).to_string();
    let (status, _) = post_request(&headers, "/api/seller/orders/abc/status", &body, configure(MockStore::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
