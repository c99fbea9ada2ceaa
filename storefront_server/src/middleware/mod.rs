mod seller_key;
mod signature;

pub use seller_key::{SellerKeyMiddlewareFactory, SellerKeyMiddlewareService, SELLER_KEY_HEADER};
pub use signature::{SignatureMiddlewareFactory, SignatureMiddlewareService, SIGNATURE_HEADER};
