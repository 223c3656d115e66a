//! HMAC-SHA256 verification of inbound webhook deliveries.
//!
//! Up signs the raw request body with the webhook's secret key and sends the
//! hex-encoded digest in [`SIGNATURE_HEADER`]. Verification must run over the exact
//! bytes received, before anything acts on the decoded payload.

use crate::domain::errors::WebhookError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const SIGNATURE_HEADER: &str = "X-Up-Authenticity-Signature";

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct WebhookAuthenticator {
    keyed: HmacSha256,
}

impl WebhookAuthenticator {
    pub fn new(secret_key: &[u8]) -> Self {
        let keyed =
            HmacSha256::new_from_slice(secret_key).expect("HMAC can take key of any size");
        Self { keyed }
    }

    /// Check `signature` (hex, as sent in the header) against the body.
    ///
    /// A missing, empty or non-hex signature is rejected before any MAC is computed.
    /// The digest comparison is constant-time.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
        let expected = signature
            .and_then(|s| hex::decode(s).ok())
            .filter(|decoded| !decoded.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        let mut mac = self.keyed.clone();
        mac.update(body);
        mac.verify_slice(&expected)
            .map_err(|_| WebhookError::SignatureMismatch)
    }

    /// Hex-encoded signature Up would send for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.keyed.clone();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for WebhookAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookAuthenticator").finish_non_exhaustive()
    }
}
