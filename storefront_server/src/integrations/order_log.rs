//! Audit trail for orders.
//!
//! Writes a line to the `sfs::orders` log target whenever an order is created or changes status.
use log::*;
use storefront_engine::events::EventHooks;

const ORDER_LOG_TARGET: &str = "sfs::orders";

pub fn order_log_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_order_created(|ev| {
        Box::pin(async move {
            let lines =
                ev.items.iter().map(|i| format!("{} x {} @ {}", i.quantity, i.product_id, i.price)).collect::<Vec<_>>();
            info!(
                target: ORDER_LOG_TARGET,
                "📦️ Order #{} created. Session: {}. Buyer: {}. Charged: {}. Ship to: {}, {}. Items: [{}]",
                ev.order.id,
                ev.order.session_id,
                ev.order.buyer_id,
                ev.order.total_amount,
                ev.order.address.full_name,
                ev.order.address.city,
                lines.join(", ")
            );
        })
    });
    hooks.on_order_status_changed(|ev| {
        Box::pin(async move {
            info!(
                target: ORDER_LOG_TARGET,
                "📦️ Order #{} moved from {} to {}",
                ev.order.id,
                ev.old_status,
                ev.new_status()
            );
        })
    });
    hooks
}
