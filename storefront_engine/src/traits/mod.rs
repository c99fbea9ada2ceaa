//! #  Storage collaborator contracts.
//!
//! This module provides the interfaces that the fulfillment engine needs from its storage *backends*. Every concern is
//! a separate trait, so that an API only depends on the behaviour it actually uses, and tests can substitute fakes for
//! exactly the collaborators they care about.
//!
//! ## Traits
//! * [`AddressManagement`] resolves shipping addresses from the buyer's address book.
//! * [`OrderManagement`] stores and queries orders and their line items. Order creation is idempotent on the checkout
//!   session id.
//! * [`ProductCatalog`] reads prices and stock levels, and adjusts stock.
//! * [`CartManagement`] manages the buyer's live, server-side cart.
//! * [`StorefrontDatabase`] is the union of the above and is what a complete backend (e.g. `SqliteDatabase`)
//!   implements.
mod address_management;
mod cart_management;
mod order_management;
mod product_catalog;
mod storefront_database;

pub use address_management::AddressManagement;
pub use cart_management::CartManagement;
pub use order_management::OrderManagement;
pub use product_catalog::ProductCatalog;
pub use storefront_database::{StoreError, StorefrontDatabase};
