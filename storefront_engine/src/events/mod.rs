//! Order lifecycle events.
//!
//! Components can subscribe to these through [`EventHooks`]. Publishing never blocks the fulfillment flow on a
//! subscriber, and a missing subscriber is not an error.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
