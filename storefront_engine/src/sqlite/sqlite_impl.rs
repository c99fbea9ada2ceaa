//! `SqliteDatabase` is a concrete implementation of a storefront backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{
    addresses,
    carts,
    create_database_if_missing,
    db_url,
    new_pool,
    orders,
    products,
    run_migrations,
};
use crate::{
    db_types::{
        InsertOrderResult,
        NewOrder,
        Order,
        OrderItem,
        OrderStatusType,
        Product,
        SellerOrder,
        SessionId,
        ShippingAddress,
    },
    traits::{
        AddressManagement,
        CartManagement,
        OrderManagement,
        ProductCatalog,
        StoreError,
        StorefrontDatabase,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl StorefrontDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        self.pool.close().await;
        Ok(())
    }
}

impl AddressManagement for SqliteDatabase {
    async fn fetch_address(&self, address_id: &str) -> Result<Option<ShippingAddress>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let address = addresses::fetch_address(address_id, &mut conn).await?;
        Ok(address)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order_by_session_id(&self, session_id: &SessionId) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_session_id(session_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(order_id, &mut conn).await?;
        Ok(order)
    }

    /// Stores the order and its items in a single transaction. The transaction is only committed if the order row
    /// was actually inserted, so a duplicate delivery leaves no trace.
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = orders::idempotent_insert(order, &mut tx).await?;
        match &result {
            InsertOrderResult::Inserted(order, items) => {
                tx.commit().await?;
                debug!("🗃️ Order #{} for session [{}] saved with {} line items", order.id, order.session_id, items.len());
            },
            InsertOrderResult::AlreadyExists(_) => tx.rollback().await?,
        }
        Ok(result)
    }

    async fn fetch_items_for_order(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let items = orders::fetch_items_for_order(order_id, &mut conn).await?;
        Ok(items)
    }

    async fn fetch_orders_with_items(&self) -> Result<Vec<SellerOrder>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_with_items(&mut conn).await?;
        Ok(orders)
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatusType) -> Result<Order, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_order_status(order_id, status, &mut conn)
            .await?
            .ok_or(StoreError::OrderNotFound(order_id))?;
        debug!("🗃️ Order #{order_id} status set to {status}");
        Ok(order)
    }
}

impl ProductCatalog for SqliteDatabase {
    async fn fetch_products(&self, product_ids: &[String]) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let products = products::fetch_products(product_ids, &mut conn).await?;
        Ok(products)
    }

    async fn decrement_stock(&self, product_id: &str, quantity: i64) -> Result<i64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let stock = products::decrement_stock(product_id, quantity, &mut conn)
            .await?
            .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))?;
        trace!("🗃️ Stock for {product_id} reduced by {quantity}. {stock} remaining");
        Ok(stock)
    }
}

impl CartManagement for SqliteDatabase {
    async fn clear_cart(&self, buyer_id: &str) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let removed = carts::clear_cart(buyer_id, &mut conn).await?;
        trace!("🗃️ Removed {removed} lines from the cart of buyer {buyer_id}");
        Ok(removed)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Creates the database file if necessary, connects to it and runs the schema migrations.
    pub async fn new_migrated(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        create_database_if_missing(url).await?;
        let db = SqliteDatabase::new_with_url(url, max_connections).await?;
        db.migrate().await?;
        Ok(db)
    }

    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        run_migrations(&self.pool).await
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
