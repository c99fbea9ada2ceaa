//! Order management for the seller panel.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderStatusType, SellerOrder},
    events::{EventProducers, OrderStatusChangedEvent},
    sf_api::SellerApiError,
    traits::OrderManagement,
};

pub struct SellerApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B: Debug> Debug for SellerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SellerApi ({:?})", self.db)
    }
}

impl<B> SellerApi<B>
where B: OrderManagement
{
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    /// Every order with its line items, newest first.
    pub async fn orders_with_items(&self) -> Result<Vec<SellerOrder>, SellerApiError> {
        let orders = self.db.fetch_orders_with_items().await?;
        trace!("🧾️ Fetched {} orders for the seller panel", orders.len());
        Ok(orders)
    }

    /// Moves an order to a new status. Any status may follow any other, but setting the status the order already has
    /// is reported as [`SellerApiError::StatusUnchanged`].
    pub async fn update_order_status(&self, order_id: i64, status: OrderStatusType) -> Result<Order, SellerApiError> {
        let current = self.db.fetch_order_by_id(order_id).await?.ok_or(SellerApiError::OrderNotFound(order_id))?;
        if current.status == status {
            debug!("🧾️ Order #{order_id} is already {status}");
            return Err(SellerApiError::StatusUnchanged { order_id, status });
        }
        let order = self.db.update_order_status(order_id, status).await?;
        info!("🧾️ Order #{order_id} moved from {} to {}", current.status, order.status);
        for emitter in &self.producers.status_changed_producer {
            emitter.publish_event(OrderStatusChangedEvent::new(order.clone(), current.status)).await;
        }
        Ok(order)
    }
}
