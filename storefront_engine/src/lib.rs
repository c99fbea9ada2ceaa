//! Storefront Engine
//!
//! The storefront engine finalizes paid checkouts. When the payment gateway reports that a checkout session has
//! completed, the engine creates the order for it (exactly once, no matter how often the notification is delivered),
//! reduces stock and clears the buyer's cart. It also provides the order management operations of the seller panel.
//! The library is provider-agnostic: it knows nothing about HTTP.
//!
//! The library is divided into these sections:
//! 1. Data types ([`mod@db_types`]) and the storage contracts the engine needs ([`mod@traits`]). A SQLite backend
//!    implementing all of them is provided by [`SqliteDatabase`].
//! 2. The checkout event schema ([`mod@checkout`]), which turns a verified notification body into a strongly typed
//!    [`checkout::GatewayEvent`], and builds the metadata a checkout session must carry.
//! 3. Webhook signature verification ([`mod@helpers`]).
//! 4. The public API ([`FulfillmentApi`] and [`SellerApi`]).
//!
//! The engine also emits events when orders are created or change status. Subscribe to them through
//! [`events::EventHooks`].
pub mod checkout;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

mod sf_api;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use sf_api::{
    errors,
    fulfillment_objects,
    FulfillmentApi,
    FulfillmentError,
    FulfillmentOutcome,
    SellerApi,
    SellerApiError,
    StockPolicy,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{AddressManagement, CartManagement, OrderManagement, ProductCatalog, StoreError, StorefrontDatabase};
