use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn hmac_sha256_hex(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Equal-length, constant-time comparison. A length mismatch returns false
/// without comparing any byte contents.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Verifies a hex-encoded HMAC-SHA256 over `payload`. The provided value is
/// lowercased first so vendor casing differences do not fail the match.
pub fn verify_hmac_sha256_hex(secret: &[u8], payload: &[u8], provided_hex: &str) -> bool {
    let expected = hmac_sha256_hex(secret, payload);
    let provided = provided_hex.trim().to_ascii_lowercase();
    constant_time_eq(expected.as_bytes(), provided.as_bytes())
}
