use sqlx::SqliteConnection;

/// Deletes every line in the buyer's live cart. Returns the number of lines removed.
pub async fn clear_cart(buyer_id: &str, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE buyer_id = $1").bind(buyer_id).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Adds `quantity` of a product to the buyer's live cart, adding to any quantity already there.
pub async fn add_to_cart(
    buyer_id: &str,
    product_id: &str,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO cart_items (buyer_id, product_id, quantity) VALUES ($1, $2, $3)
            ON CONFLICT (buyer_id, product_id) DO UPDATE SET quantity = quantity + excluded.quantity
        "#,
    )
    .bind(buyer_id)
    .bind(product_id)
    .bind(quantity)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn cart_line_count(buyer_id: &str, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE buyer_id = $1")
        .bind(buyer_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}
