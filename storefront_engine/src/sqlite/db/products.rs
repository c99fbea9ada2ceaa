use chrono::Utc;
use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::Product;

/// Fetches the given products in a single query. Unknown ids are silently skipped.
pub async fn fetch_products(ids: &[String], conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT id, name, price, stock FROM products WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");
    trace!("🗃️ Executing query: {}", builder.sql());
    let products = builder.build_query_as::<Product>().fetch_all(conn).await?;
    Ok(products)
}

/// Subtracts `quantity` from the product's stock in a single statement, flooring the result at zero.
///
/// Returns the new stock level, or `None` if the product does not exist.
pub async fn decrement_stock(
    product_id: &str,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<i64>, sqlx::Error> {
    let stock = sqlx::query_scalar(
        "UPDATE products SET stock = MAX(stock - $1, 0), updated_at = $2 WHERE id = $3 RETURNING stock",
    )
    .bind(quantity)
    .bind(Utc::now())
    .bind(product_id)
    .fetch_optional(conn)
    .await?;
    Ok(stock)
}

/// Inserts or replaces a catalog entry.
pub async fn upsert_product(product: &Product, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO products (id, name, price, stock) VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET name = excluded.name, price = excluded.price, stock = excluded.stock,
                updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(product.price.value())
    .bind(product.stock)
    .execute(conn)
    .await?;
    Ok(())
}
