mod webhook_signature;

pub use webhook_signature::{SignatureError, WebhookVerifier, DEFAULT_SIGNATURE_TOLERANCE_SECS};
