use crate::{
    db_types::{InsertOrderResult, NewOrder, Order, OrderItem, OrderStatusType, SellerOrder, SessionId},
    traits::StoreError,
};

#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches the order created for the given checkout session, if there is one.
    async fn fetch_order_by_session_id(&self, session_id: &SessionId) -> Result<Option<Order>, StoreError>;

    /// Fetches the order with the given internal id.
    async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, StoreError>;

    /// Takes a new order, and in a single atomic transaction, stores the order and all of its line items.
    ///
    /// The session id is a unique key. If an order for the session already exists (including one that was inserted
    /// concurrently, after the caller last checked), nothing is written and [`InsertOrderResult::AlreadyExists`] is
    /// returned. This is not an error.
    ///
    /// If any part of the write fails, nothing is stored.
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, StoreError>;

    /// Fetches the line items for the order with the given internal id.
    async fn fetch_items_for_order(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError>;

    /// Fetches every order along with its line items, newest first.
    async fn fetch_orders_with_items(&self) -> Result<Vec<SellerOrder>, StoreError>;

    /// Sets the status of the order with the given internal id and returns the updated order.
    ///
    /// ## Failure modes:
    /// - If the order does not exist, [`StoreError::OrderNotFound`] is returned.
    async fn update_order_status(&self, order_id: i64, status: OrderStatusType) -> Result<Order, StoreError>;
}
