mod money;

pub mod helpers;
mod secret;

pub use money::Money;
pub use secret::Secret;
