//! HMAC-SHA256 payment signature verification.
//!
//! After checkout the gateway hands the client `(order_id, payment_id,
//! signature)` where `signature = hex(HMAC-SHA256(key_secret,
//! "{order_id}|{payment_id}"))`. The server recomputes it with the shared
//! secret; a match is the only proof that the payment is genuine.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded SHA-256 digest.
pub const SIGNATURE_HEX_LEN: usize = 64;

fn keyed_mac(secret: &SecretString, order_id: &str, payment_id: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac
}

/// Compute the expected payment signature as lowercase hex.
pub fn payment_signature(secret: &SecretString, order_id: &str, payment_id: &str) -> String {
    hex::encode(keyed_mac(secret, order_id, payment_id).finalize().into_bytes())
}

/// Verify a client-supplied payment signature.
///
/// The supplied value must be exactly 64 lowercase hex characters. The
/// digest comparison itself runs in constant time.
///
/// # Returns
/// `true` if the signature matches, `false` otherwise.
pub fn verify_payment_signature(
    secret: &SecretString,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    if signature.len() != SIGNATURE_HEX_LEN
        || !signature
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return false;
    }

    let sig_bytes = match hex::decode(signature) {
        Ok(b) => b,
        Err(_) => return false,
    };

    keyed_mac(secret, order_id, payment_id)
        .verify_slice(&sig_bytes)
        .is_ok()
}
