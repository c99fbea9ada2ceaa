use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use storefront_engine::{
    checkout::{CartLine, CartSnapshot, CompletionEvent},
    db_types::{Money, SessionId},
    test_utils::{
        fixtures::{address, product, seed_address, seed_cart, seed_product},
        prepare_env::{prepare_test_env, random_db_path},
    },
    SqliteDatabase,
    StorefrontDatabase,
};

/// A migrated database holding buyer `u1` with address `a1`, product `p1` (75.00, 10 in stock) and a live cart.
pub async fn setup() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    seed_address(&db, &address("a1", "u1")).await;
    seed_product(&db, &product("p1", 7500, 10)).await;
    seed_cart(&db, "u1", &[("p1", 2)]).await;
    db
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Failed to drop database {url}: {e}");
    }
}

pub fn completion_event(session_id: &str, lines: &[(&str, i64)]) -> CompletionEvent {
    CompletionEvent {
        event_id: Some(format!("evt_{session_id}")),
        session_id: SessionId::from(session_id),
        amount_total: Money::from(15000),
        buyer_id: "u1".to_string(),
        address_id: "a1".to_string(),
        cart: lines.iter().map(|(id, qty)| CartLine::new(*id, *qty)).collect::<CartSnapshot>(),
    }
}
