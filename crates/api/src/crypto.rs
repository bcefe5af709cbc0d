//! HMAC-SHA256 signatures for session cookie values.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Hex-encoded HMAC-SHA256 of `payload` under `secret`.
pub fn sign(secret: &str, payload: &str) -> String {
    let mut mac = new_mac(secret);
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check a hex signature produced by [`sign`]. Comparison is constant-time.
pub fn verify(secret: &str, payload: &str, signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac = new_mac(secret);
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).is_ok()
}

fn new_mac(secret: &str) -> Hmac<Sha256> {
    Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size")
}
