use sqlx::SqliteConnection;

use crate::db_types::ShippingAddress;

pub async fn fetch_address(id: &str, conn: &mut SqliteConnection) -> Result<Option<ShippingAddress>, sqlx::Error> {
    let address = sqlx::query_as(
        r#"
            SELECT id, buyer_id, full_name, phone, street, city, state, postal_code
            FROM addresses WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(address)
}

pub async fn insert_address(address: &ShippingAddress, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO addresses (id, buyer_id, full_name, phone, street, city, state, postal_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(&address.id)
    .bind(&address.buyer_id)
    .bind(&address.full_name)
    .bind(&address.phone)
    .bind(&address.street)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.postal_code)
    .execute(conn)
    .await?;
    Ok(())
}
