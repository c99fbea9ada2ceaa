//! # Checkout data coming back from the payment gateway
//!
//! When a buyer checks out, the storefront attaches a small metadata bag to the hosted payment session (see
//! [`CheckoutMetadata`]): the buyer id, the shipping address id, and a JSON snapshot of the cart containing only
//! product ids and quantities. Once the payment completes, the gateway sends the session back to us in a signed
//! webhook, and [`GatewayEvent`] turns that envelope into a strongly typed [`CompletionEvent`].
mod cart;
mod checkout_metadata;
mod gateway_event;

pub use cart::{CartLine, CartSnapshot, MAX_LINE_QUANTITY};
pub use checkout_metadata::{CheckoutItem, CheckoutMetadata, CheckoutProduct, CheckoutRequest, CheckoutRequestError};
pub use gateway_event::{check_cart, CompletionEvent, EventFormatError, GatewayEvent, CHECKOUT_COMPLETED_EVENT};
