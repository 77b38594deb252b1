//! HMAC request signing.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::CadError;

type HmacSha256 = Hmac<Sha256>;

/// Computes the base64 HMAC-SHA256 signature of a request.
///
/// The signed message is the plain concatenation
/// `timestamp + nonce + method + path + query + body`.
///
/// # Errors
///
/// Returns [`CadError::Key`] if the key is rejected by the MAC.
pub fn sign(
    secret_key: &str,
    timestamp: &str,
    nonce: &str,
    method: &str,
    path: &str,
    query: &str,
    body: &str,
) -> Result<String, CadError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| CadError::Key(e.to_string()))?;

    for part in [timestamp, nonce, method, path, query, body] {
        mac.update(part.as_bytes());
    }

    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}
