use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Verify a LINE webhook signature.
///
/// `signature_b64` is the `X-Line-Signature` header value: the base64-encoded
/// HMAC-SHA256 of the raw body keyed by the channel secret. Comparison is
/// constant-time.
pub fn verify_signature(
    channel_secret: &[u8],
    body: &[u8],
    signature_b64: &str,
) -> Result<(), WebhookError> {
    let expected = STANDARD
        .decode(signature_b64.trim())
        .map_err(|_| WebhookError::InvalidSignature)?;

    let mut mac =
        HmacSha256::new_from_slice(channel_secret).map_err(|_| WebhookError::InvalidSignature)?;
    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_| WebhookError::InvalidSignature)
}

/// Compute the signature LINE would send for `body`.
pub fn sign(channel_secret: &[u8], body: &[u8]) -> String {
    // HMAC accepts keys of any length.
    let mut mac = match HmacSha256::new_from_slice(channel_secret) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"channel-secret";
    const BODY: &[u8] = br#"{"destination":"U0","events":[]}"#;

    #[test]
    fn valid_signature_passes() {
        let sig = sign(SECRET, BODY);
        assert!(verify_signature(SECRET, BODY, &sig).is_ok());
    }

    #[test]
    fn tampered_body_fails() {
        let sig = sign(SECRET, BODY);
        let result = verify_signature(SECRET, br#"{"events":[{}]}"#, &sig);
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = sign(b"other-secret", BODY);
        assert!(verify_signature(SECRET, BODY, &sig).is_err());
    }

    #[test]
    fn non_base64_header_fails() {
        let result = verify_signature(SECRET, BODY, "not base64 at all!");
        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }
}
