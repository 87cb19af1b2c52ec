//! Signed outer envelope for the payload frame (§4.1).
//!
//! Signed mode wraps the inner bytes as `{message: bytes, signature: bytes}`
//! where the signature covers SHA-256(inner bytes). Unsigned mode wraps only
//! `{message: bytes}` and skips verification entirely.

use rmpv::Value;

use super::error::CryptoError;
use super::keystore::KeyStore;
use crate::wire::{Frame, WireError};

/// Wrap `inner` bytes for transmission, signing if `keystore` has a local key.
pub fn wrap(keystore: &KeyStore, inner: Vec<u8>) -> Result<Vec<u8>, WireError> {
    let frame = match keystore.sign(&inner) {
        Some(signature) => Frame::map([
            ("message", Value::Binary(inner)),
            ("signature", Value::Binary(signature)),
        ]),
        None => Frame::map([("message", Value::Binary(inner))]),
    };
    frame.encode()
}

/// Unwrap a received payload frame. When `keystore` is configured to sign
/// (`is_signing`), a signature is required and verified against `identity`;
/// a frame with no `signature` field is rejected rather than accepted as
/// unsigned, so a peer cannot bypass verification by omitting the field.
pub fn unwrap(keystore: &KeyStore, identity: &str, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let frame = Frame::decode(payload).map_err(|e| CryptoError::MalformedFrame(e.to_string()))?;
    let message = frame
        .get_bytes("message")
        .ok_or_else(|| CryptoError::MalformedFrame("missing message field".to_string()))?
        .to_vec();

    match frame.get_bytes("signature") {
        Some(signature) => {
            keystore.verify(identity, &message, signature)?;
            Ok(message)
        }
        None if keystore.is_signing() => Err(CryptoError::SignatureMismatch(identity.to_string())),
        None => Ok(message),
    }
}
