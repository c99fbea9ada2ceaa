use std::collections::HashMap;

use chrono::Utc;
use log::{debug, trace};
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db_types::{
        InsertOrderResult,
        NewOrder,
        NewOrderItem,
        Order,
        OrderItem,
        OrderStatusType,
        SellerOrder,
        SellerOrderItem,
        SessionId,
    },
    traits::StoreError,
};

/// Inserts the order and its line items, returning [`InsertOrderResult::AlreadyExists`] if an order for the same
/// checkout session is already stored.
///
/// This is not atomic on its own. Embed the call in a transaction and pass `&mut *tx` as the connection, then commit
/// only if the order was inserted.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<InsertOrderResult, StoreError> {
    let session_id = order.session_id.clone();
    let inserted = match insert_order(&order, conn).await {
        Ok(Some(o)) => o,
        Ok(None) => {
            debug!("🗃️ Order for session [{session_id}] already exists. Nothing inserted.");
            return Ok(InsertOrderResult::AlreadyExists(session_id));
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            debug!("🗃️ Order for session [{session_id}] was inserted concurrently. Nothing inserted.");
            return Ok(InsertOrderResult::AlreadyExists(session_id));
        },
        Err(e) => return Err(e.into()),
    };
    debug!("🗃️ Order for session [{session_id}] inserted with id {}", inserted.id);
    let mut items = Vec::with_capacity(order.items.len());
    for item in &order.items {
        let item = insert_order_item(inserted.id, item, conn).await?;
        trace!("🗃️ Line item {} ({} x {}) added to order {}", item.product_id, item.quantity, item.price, inserted.id);
        items.push(item);
    }
    Ok(InsertOrderResult::Inserted(inserted, items))
}

/// Inserts the order row. Returns `None` if the session id is already taken.
async fn insert_order(order: &NewOrder, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                session_id,
                buyer_id,
                total_amount,
                address,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (session_id) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(order.session_id.as_str())
    .bind(&order.buyer_id)
    .bind(order.total_amount.value())
    .bind(Json(&order.address))
    .bind(OrderStatusType::Preparing.to_string())
    .bind(order.created_at)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

async fn insert_order_item(
    order_id: i64,
    item: &NewOrderItem,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, sqlx::Error> {
    let item = sqlx::query_as(
        r#"
            INSERT INTO order_items (order_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, product_id, quantity, price;
        "#,
    )
    .bind(order_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.price.value())
    .fetch_one(conn)
    .await?;
    Ok(item)
}

/// Returns the order created for the given checkout session, if any
pub async fn fetch_order_by_session_id(
    session_id: &SessionId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE session_id = $1")
        .bind(session_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_items_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as(
        "SELECT id, order_id, product_id, quantity, price FROM order_items WHERE order_id = $1 ORDER BY id ASC",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

/// Fetches all orders, newest first, each with its line items and the current catalog name of each product.
pub async fn fetch_orders_with_items(conn: &mut SqliteConnection) -> Result<Vec<SellerOrder>, sqlx::Error> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC, id DESC").fetch_all(&mut *conn).await?;
    let items: Vec<SellerOrderItem> = sqlx::query_as(
        r#"
            SELECT
                order_items.id as id,
                order_items.order_id as order_id,
                order_items.product_id as product_id,
                products.name as product_name,
                order_items.quantity as quantity,
                order_items.price as price
            FROM order_items LEFT JOIN products ON order_items.product_id = products.id
            ORDER BY order_items.order_id, order_items.id
        "#,
    )
    .fetch_all(conn)
    .await?;
    let mut items_by_order = HashMap::<i64, Vec<SellerOrderItem>>::new();
    for item in items {
        items_by_order.entry(item.order_id).or_default().push(item);
    }
    let result = orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            SellerOrder { order, items }
        })
        .collect();
    Ok(result)
}

/// Sets the order status. Returns `None` if there is no order with the given id.
pub async fn update_order_status(
    id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *")
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}
