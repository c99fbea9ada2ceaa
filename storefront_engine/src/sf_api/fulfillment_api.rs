use std::{collections::HashMap, fmt::Debug};

use log::*;

use crate::{
    checkout::{check_cart, CartSnapshot, CompletionEvent, GatewayEvent},
    db_types::{InsertOrderResult, Money, NewOrder, NewOrderItem, Order, OrderItem, Product},
    events::{EventProducers, OrderCreatedEvent},
    sf_api::{FulfillmentError, FulfillmentOutcome, StockPolicy},
    traits::{AddressManagement, CartManagement, OrderManagement, ProductCatalog},
};

/// `FulfillmentApi` turns verified payment notifications into orders.
///
/// The primary path (idempotency check, address, products, order insert) short-circuits on the first error. The
/// secondary effects (stock and cart) run only once the order is durably stored, and their failures are logged but
/// never reported to the caller.
pub struct FulfillmentApi<B> {
    db: B,
    producers: EventProducers,
    stock_policy: StockPolicy,
}

impl<B> Debug for FulfillmentApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FulfillmentApi ({})", self.stock_policy)
    }
}

impl<B> FulfillmentApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers, stock_policy: StockPolicy::default() }
    }

    pub fn with_stock_policy(mut self, stock_policy: StockPolicy) -> Self {
        self.stock_policy = stock_policy;
        self
    }

    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> FulfillmentApi<B>
where B: AddressManagement + OrderManagement + ProductCatalog + CartManagement
{
    /// Parses a raw, already verified, notification body and processes it.
    pub async fn process_payload(&self, payload: &[u8]) -> Result<FulfillmentOutcome, FulfillmentError> {
        let event = GatewayEvent::from_slice(payload).map_err(|e| {
            warn!("🔄️📦️ Rejecting malformed checkout notification. {e}");
            FulfillmentError::from(e)
        })?;
        self.process_gateway_event(event).await
    }

    pub async fn process_gateway_event(&self, event: GatewayEvent) -> Result<FulfillmentOutcome, FulfillmentError> {
        match event {
            GatewayEvent::CheckoutCompleted(ev) => self.process_completion_event(ev).await,
            GatewayEvent::Ignored { event_type } => {
                debug!("🔄️📦️ Ignoring '{event_type}' notification");
                Ok(FulfillmentOutcome::Ignored(event_type))
            },
        }
    }

    /// Creates the order for a completed checkout session, at most once per session id.
    ///
    /// ## Failure modes
    /// * The cart is empty, or a quantity is below 1 or above [`crate::checkout::MAX_LINE_QUANTITY`]: the event is
    ///   malformed and nothing is read or written.
    /// * The address or any product cannot be found: nothing is written, and the error is retryable.
    /// * [`StockPolicy::RejectOversell`] is active and a line exceeds the available stock: nothing is written.
    /// * Any database error on the primary path: nothing is written.
    ///
    /// Failing to adjust stock or to clear the buyer's cart is *not* an error.
    pub async fn process_completion_event(
        &self,
        event: CompletionEvent,
    ) -> Result<FulfillmentOutcome, FulfillmentError> {
        let session_id = event.session_id.clone();
        trace!("🔄️📦️ Processing completed checkout session [{session_id}] (event {:?})", event.event_id);
        check_cart(&event.cart).map_err(|e| {
            warn!("🔄️📦️ Rejecting the cart of checkout session [{session_id}]. {e}");
            FulfillmentError::from(e)
        })?;
        if let Some(order) = self.db.fetch_order_by_session_id(&session_id).await? {
            info!("🔄️📦️ Checkout session [{session_id}] already produced order #{}. Nothing to do.", order.id);
            return Ok(FulfillmentOutcome::AlreadyProcessed(session_id));
        }
        let address = self.db.fetch_address(&event.address_id).await?.ok_or_else(|| {
            warn!("🔄️📦️ Shipping address {} for session [{session_id}] does not exist", event.address_id);
            FulfillmentError::AddressNotFound(event.address_id.clone())
        })?;
        let cart = event.cart.merged();
        let products = self.resolve_products(&cart).await?;
        self.check_stock(&cart, &products)?;
        let mut order = NewOrder::new(session_id.clone(), event.buyer_id.clone(), event.amount_total, address);
        for line in cart.lines() {
            let product = products
                .get(&line.product_id)
                .ok_or_else(|| FulfillmentError::UnknownProducts(vec![line.product_id.clone()]))?;
            order = order.with_item(NewOrderItem::new(&product.id, line.quantity, product.price));
        }
        check_charged_total(&order);
        let (order, items) = match self.db.insert_order(order).await? {
            InsertOrderResult::Inserted(order, items) => (order, items),
            InsertOrderResult::AlreadyExists(session_id) => {
                info!("🔄️📦️ Checkout session [{session_id}] was processed by a concurrent delivery. Nothing to do.");
                return Ok(FulfillmentOutcome::AlreadyProcessed(session_id));
            },
        };
        info!(
            "🔄️📦️ Order #{} created for session [{session_id}]. {} items, {} charged",
            order.id,
            items.len(),
            order.total_amount
        );
        self.adjust_inventory(&items).await;
        self.clear_cart(&order.buyer_id).await;
        self.call_order_created_hook(&order, &items).await;
        Ok(FulfillmentOutcome::Created(order, items))
    }

    /// Reads every product in the cart in one query. Any id that is not in the catalog fails the whole cart.
    async fn resolve_products(&self, cart: &CartSnapshot) -> Result<HashMap<String, Product>, FulfillmentError> {
        let ids = cart.product_ids();
        let products = self.db.fetch_products(&ids).await?;
        let products = products.into_iter().map(|p| (p.id.clone(), p)).collect::<HashMap<_, _>>();
        let missing = ids.into_iter().filter(|id| !products.contains_key(id)).collect::<Vec<_>>();
        if !missing.is_empty() {
            error!("🔄️📦️ The cart refers to unknown products: {}", missing.join(", "));
            return Err(FulfillmentError::UnknownProducts(missing));
        }
        Ok(products)
    }

    fn check_stock(&self, cart: &CartSnapshot, products: &HashMap<String, Product>) -> Result<(), FulfillmentError> {
        if self.stock_policy == StockPolicy::AllowOversell {
            return Ok(());
        }
        for line in cart.lines() {
            let available = products.get(&line.product_id).map(|p| p.stock).unwrap_or_default();
            if line.quantity > available {
                warn!(
                    "🔄️📦️ Refusing order. {} of {} requested, but only {available} in stock",
                    line.quantity, line.product_id
                );
                return Err(FulfillmentError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    requested: line.quantity,
                    available,
                });
            }
        }
        Ok(())
    }

    async fn adjust_inventory(&self, items: &[OrderItem]) {
        for item in items {
            match self.db.decrement_stock(&item.product_id, item.quantity).await {
                Ok(stock) => debug!("🔄️📦️ Stock for {} is now {stock}", item.product_id),
                Err(e) => error!(
                    "🔄️📦️ Could not reduce stock of {} by {} for order #{}. The order stands. {e}",
                    item.product_id, item.quantity, item.order_id
                ),
            }
        }
    }

    async fn clear_cart(&self, buyer_id: &str) {
        match self.db.clear_cart(buyer_id).await {
            Ok(n) => debug!("🔄️📦️ Cleared {n} lines from the cart of buyer {buyer_id}"),
            Err(e) => error!("🔄️📦️ Could not clear the cart of buyer {buyer_id}. The order stands. {e}"),
        }
    }

    async fn call_order_created_hook(&self, order: &Order, items: &[OrderItem]) {
        for emitter in &self.producers.order_created_producer {
            debug!("🔄️📦️ Notifying order created hook subscribers");
            let event = OrderCreatedEvent::new(order.clone(), items.to_vec());
            emitter.publish_event(event).await;
        }
    }
}

/// The gateway's total is authoritative, but a difference from the catalog prices is worth a note in the log
/// (shipping, discounts and price changes all cause one).
fn check_charged_total(order: &NewOrder) {
    let catalog_total = order
        .items
        .iter()
        .try_fold(Money::default(), |total, i| i.price.checked_mul(i.quantity).and_then(|t| total.checked_add(t)));
    match catalog_total {
        Some(total) if total == order.total_amount => {},
        Some(total) => info!(
            "🔄️📦️ Session [{}] was charged {}, but the catalog prices add up to {total}",
            order.session_id, order.total_amount
        ),
        None => warn!(
            "🔄️📦️ Session [{}] was charged {}, but the catalog total is too large to compute",
            order.session_id, order.total_amount
        ),
    }
}
