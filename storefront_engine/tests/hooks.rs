use std::sync::{
    atomic::{AtomicI32, Ordering},
    Arc,
};

use log::*;
use storefront_engine::{
    db_types::OrderStatusType,
    events::{EventHandlers, EventHooks},
    FulfillmentApi,
    SellerApi,
};
use tokio::runtime::Runtime;

use crate::support::{completion_event, setup, tear_down};

mod support;

#[derive(Default, Clone)]
struct HookCalled {
    called: Arc<AtomicI32>,
}

impl HookCalled {
    pub fn called(&self) {
        let _ = self.called.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> i32 {
        self.called.load(Ordering::SeqCst)
    }
}

#[test]
fn on_order_created() {
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let event_copy = event.clone();
    rt.block_on(async move {
        let db = setup().await;
        let mut hooks = EventHooks::default();
        hooks.on_order_created(move |ev| {
            info!("🪝️ Order #{} created for session {}", ev.order.id, ev.order.session_id);
            let event_copy = event_copy.clone();
            Box::pin(async move { event_copy.called() })
        });
        let handlers = EventHandlers::new(10, hooks);
        let api = FulfillmentApi::new(db.clone(), handlers.producers());
        let handle = tokio::spawn(handlers.start_handlers());
        api.process_completion_event(completion_event("cs_1", &[("p1", 1)])).await.expect("Error processing event");
        // A redelivery must not fire the hook again
        api.process_completion_event(completion_event("cs_1", &[("p1", 1)])).await.expect("Error processing event");
        api.process_completion_event(completion_event("cs_2", &[("p1", 1)])).await.expect("Error processing event");
        // Dropping the api drops the last producer, which lets the handler drain and stop
        drop(api);
        handle.await.unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
        tear_down(db).await;
    });
    assert_eq!(event.count(), 2);
    info!("🪝️ test complete");
}

#[test]
fn on_order_status_changed() {
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let event_copy = event.clone();
    rt.block_on(async move {
        let db = setup().await;
        let mut hooks = EventHooks::default();
        hooks.on_order_status_changed(move |ev| {
            info!("🪝️ Order #{} moved from {} to {}", ev.order.id, ev.old_status, ev.new_status());
            let event_copy = event_copy.clone();
            Box::pin(async move { event_copy.called() })
        });
        let handlers = EventHandlers::new(10, hooks);
        let fulfillment = FulfillmentApi::new(db.clone(), handlers.producers());
        let seller = SellerApi::new(db.clone(), handlers.producers());
        let handle = tokio::spawn(handlers.start_handlers());
        let outcome = fulfillment.process_completion_event(completion_event("cs_1", &[("p1", 1)])).await.unwrap();
        let id = outcome.order().map(|o| o.id).expect("Expected a new order");
        seller.update_order_status(id, OrderStatusType::Shipped).await.unwrap();
        // Not a change, so no event
        assert!(seller.update_order_status(id, OrderStatusType::Shipped).await.is_err());
        seller.update_order_status(id, OrderStatusType::Delivered).await.unwrap();
        drop(fulfillment);
        drop(seller);
        handle.await.unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
        tear_down(db).await;
    });
    assert_eq!(event.count(), 2);
}
