//! # Storefront engine public API
//!
//! * [`fulfillment_api`] turns checkout completion notifications into orders, exactly once per checkout session, and
//!   applies the secondary effects (stock, cart) on a best-effort basis.
//! * [`seller_api`] lists orders and moves them through their lifecycle.
//!
//! Both APIs are created by handing them a backend that implements the storage traits they need, together with the
//! event producers that should hear about what they do:
//!
//! ```rust,ignore
//! use storefront_engine::{events::EventProducers, FulfillmentApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/storefront.db", 5).await?;
//! let api = FulfillmentApi::new(db, EventProducers::default());
//! let outcome = api.process_payload(&verified_body).await?;
//! ```
pub mod errors;
pub mod fulfillment_api;
pub mod fulfillment_objects;
pub mod seller_api;

pub use errors::{FulfillmentError, SellerApiError};
pub use fulfillment_api::FulfillmentApi;
pub use fulfillment_objects::{FulfillmentOutcome, StockPolicy};
pub use seller_api::SellerApi;
