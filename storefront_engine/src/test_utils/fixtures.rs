//! Seed data for tests.
use crate::{
    db_types::{Money, Product, ShippingAddress},
    sqlite::db::{addresses, carts, products},
    SqliteDatabase,
};

pub fn address(id: &str, buyer_id: &str) -> ShippingAddress {
    ShippingAddress {
        id: id.to_string(),
        buyer_id: buyer_id.to_string(),
        full_name: "Ada Lovelace".to_string(),
        phone: "555-0100".to_string(),
        street: "12 Analytical Way".to_string(),
        city: "London".to_string(),
        state: String::new(),
        postal_code: "N1 9GU".to_string(),
    }
}

pub fn product(id: &str, price: i64, stock: i64) -> Product {
    Product { id: id.to_string(), name: format!("Product {id}"), price: Money::from(price), stock }
}

pub async fn seed_address(db: &SqliteDatabase, address: &ShippingAddress) {
    let mut conn = db.pool().acquire().await.expect("Could not acquire a connection");
    addresses::insert_address(address, &mut conn).await.expect("Could not insert address");
}

pub async fn seed_product(db: &SqliteDatabase, product: &Product) {
    let mut conn = db.pool().acquire().await.expect("Could not acquire a connection");
    products::upsert_product(product, &mut conn).await.expect("Could not insert product");
}

pub async fn seed_cart(db: &SqliteDatabase, buyer_id: &str, lines: &[(&str, i64)]) {
    let mut conn = db.pool().acquire().await.expect("Could not acquire a connection");
    for (product_id, quantity) in lines {
        carts::add_to_cart(buyer_id, product_id, *quantity, &mut conn).await.expect("Could not add to cart");
    }
}

pub async fn cart_line_count(db: &SqliteDatabase, buyer_id: &str) -> i64 {
    let mut conn = db.pool().acquire().await.expect("Could not acquire a connection");
    carts::cart_line_count(buyer_id, &mut conn).await.expect("Could not count cart lines")
}

pub async fn stock_of(db: &SqliteDatabase, product_id: &str) -> i64 {
    let ids = [product_id.to_string()];
    let mut conn = db.pool().acquire().await.expect("Could not acquire a connection");
    let found = products::fetch_products(&ids, &mut conn).await.expect("Could not fetch product");
    found.first().map(|p| p.stock).expect("Product does not exist")
}

pub async fn order_count(db: &SqliteDatabase) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders").fetch_one(db.pool()).await.expect("Could not count orders")
}

pub async fn order_item_count(db: &SqliteDatabase) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
        .fetch_one(db.pool())
        .await
        .expect("Could not count order items")
}
