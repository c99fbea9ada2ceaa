//! # Webhook signature format
//!
//! The payment gateway signs every webhook delivery so that we can tell genuine completion events apart from forged
//! or corrupted ones. The signature travels in a header of the form
//!
//! ```text
//!    t=1717171717,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
//! ```
//!
//! where
//!   * `t` is the unix timestamp (seconds) at which the gateway signed the payload,
//!   * `v1` is the hex-encoded `HMAC-SHA256(secret, "{t}.{raw_body}")`. The gateway may send several `v1` entries
//!     while it rotates secrets; a match on any of them is accepted.
//!
//! The MAC is always computed over the *raw* request body, byte for byte. Never re-serialize a parsed body to check
//! it.
//!
//! Deliveries whose timestamp is further than the tolerance from the current time are rejected, which limits the
//! window in which a captured delivery can be replayed.
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use log::{trace, warn};
use sha2::Sha256;
use storefront_common::Secret;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("No signature header was provided")]
    MissingHeader,
    #[error("The signature header is not in the expected format")]
    MalformedHeader,
    #[error("The signature header does not contain a timestamp")]
    MissingTimestamp,
    #[error("The signature header does not contain a v1 signature")]
    MissingSignature,
    #[error("The signature timestamp is outside the tolerance window")]
    TimestampOutsideTolerance,
    #[error("No signature matches the payload")]
    SignatureMismatch,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct SignatureHeader {
    timestamp: Option<i64>,
    signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    fn parse(header: &str) -> Result<Self, SignatureError> {
        if header.trim().is_empty() {
            return Err(SignatureError::MissingHeader);
        }
        let mut result = SignatureHeader::default();
        for part in header.split(',') {
            let (key, value) = part.trim().split_once('=').ok_or(SignatureError::MalformedHeader)?;
            match key {
                "t" => {
                    let t = value.parse::<i64>().map_err(|_| SignatureError::MalformedHeader)?;
                    result.timestamp = Some(t);
                },
                "v1" => match hex::decode(value) {
                    Ok(sig) => result.signatures.push(sig),
                    // A garbled entry can't match anything, but a sibling entry still might
                    Err(e) => trace!("🔐️ Ignoring undecodable v1 signature. {e}"),
                },
                // Other schemes (e.g. v0) are not trusted
                _ => {},
            }
        }
        Ok(result)
    }
}

/// Verifies webhook signatures with the shared secret configured for the payment gateway.
#[derive(Clone, Debug)]
pub struct WebhookVerifier {
    secret: Secret<String>,
    tolerance: Duration,
}

impl WebhookVerifier {
    pub fn new(secret: Secret<String>, tolerance: Duration) -> Self {
        Self { secret, tolerance }
    }

    pub fn with_default_tolerance(secret: Secret<String>) -> Self {
        Self::new(secret, Duration::seconds(DEFAULT_SIGNATURE_TOLERANCE_SECS))
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Verify `payload` against the signature `header`, using the current time for the tolerance check.
    pub fn verify(&self, payload: &[u8], header: &str) -> Result<(), SignatureError> {
        self.verify_at(payload, header, Utc::now())
    }

    pub fn verify_at(&self, payload: &[u8], header: &str, now: DateTime<Utc>) -> Result<(), SignatureError> {
        let header = SignatureHeader::parse(header)?;
        let timestamp = header.timestamp.ok_or(SignatureError::MissingTimestamp)?;
        if header.signatures.is_empty() {
            return Err(SignatureError::MissingSignature);
        }
        let age = now.timestamp().checked_sub(timestamp).map(i64::unsigned_abs);
        match age {
            Some(age) if age <= self.tolerance.num_seconds().unsigned_abs() => {},
            _ => {
                warn!("🔐️ Webhook signature timestamp {timestamp} is outside the tolerance window. Rejecting.");
                return Err(SignatureError::TimestampOutsideTolerance);
            },
        }
        let mac = self.mac_for(payload, timestamp);
        let matched = header.signatures.iter().any(|sig| mac.clone().verify_slice(sig).is_ok());
        if matched {
            trace!("🔐️ Webhook signature verified");
            Ok(())
        } else {
            Err(SignatureError::SignatureMismatch)
        }
    }

    /// Produce a signature header value for `payload` at the given timestamp. This is what the gateway does on its side.
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> String {
        let mac = self.mac_for(payload, timestamp);
        let sig = hex::encode(mac.finalize().into_bytes());
        format!("t={timestamp},v1={sig}")
    }

    fn mac_for(&self, payload: &[u8], timestamp: i64) -> HmacSha256 {
        // HMAC accepts keys of any length, so this cannot fail
        #[allow(clippy::expect_used)]
        let mut mac =
            HmacSha256::new_from_slice(self.secret.reveal().as_bytes()).expect("HMAC can take a key of any size");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac
    }
}
