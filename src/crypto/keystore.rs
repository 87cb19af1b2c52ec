//! Signing-key cache, mirroring `SecurityManager`'s key caches: one local
//! signing key plus a cache of looked-up peer public keys, loaded from
//! `<identity-lowercase>.pem` files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use ed25519_dalek::pkcs8::{DecodePrivateKey, DecodePublicKey};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use super::error::CryptoError;

/// Caches the local signing key (if configured) and peer public keys looked
/// up by identity. Cheap to clone — shared state lives behind an `Arc`.
#[derive(Clone)]
pub struct KeyStore {
    inner: Arc<Inner>,
}

struct Inner {
    signing_key: Option<SigningKey>,
    key_dir: Option<PathBuf>,
    peer_keys: DashMap<String, VerifyingKey>,
}

impl KeyStore {
    /// No local signing key and no peer key directory: messages are wrapped
    /// unsigned and incoming signatures are never checked.
    pub fn unsigned() -> Self {
        Self {
            inner: Arc::new(Inner {
                signing_key: None,
                key_dir: None,
                peer_keys: DashMap::new(),
            }),
        }
    }

    /// Load the local signing key from a PKCS#8 PEM file and configure the
    /// directory peer public keys are loaded from.
    pub fn load(signing_key_path: impl AsRef<Path>, peer_key_dir: impl Into<PathBuf>) -> Result<Self, CryptoError> {
        let path = signing_key_path.as_ref();
        let pem = std::fs::read_to_string(path).map_err(|e| CryptoError::KeyIo {
            identity: "self".to_string(),
            path: path.display().to_string(),
            source: e,
        })?;
        let signing_key = SigningKey::from_pkcs8_pem(&pem)
            .map_err(|_| CryptoError::InvalidKey(path.display().to_string()))?;
        Ok(Self {
            inner: Arc::new(Inner {
                signing_key: Some(signing_key),
                key_dir: Some(peer_key_dir.into()),
                peer_keys: DashMap::new(),
            }),
        })
    }

    pub fn is_signing(&self) -> bool {
        self.inner.signing_key.is_some()
    }

    /// Sign SHA-256(`inner_bytes`) with the local key, if configured.
    pub fn sign(&self, inner_bytes: &[u8]) -> Option<Vec<u8>> {
        let key = self.inner.signing_key.as_ref()?;
        let digest = Sha256::digest(inner_bytes);
        let signature: Signature = key.sign(&digest);
        Some(signature.to_bytes().to_vec())
    }

    /// Verify a signature over SHA-256(`inner_bytes`) against `identity`'s
    /// cached or freshly-loaded public key.
    pub fn verify(&self, identity: &str, inner_bytes: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let key = self.peer_key(identity)?;
        let digest = Sha256::digest(inner_bytes);
        let signature = Signature::from_slice(signature)
            .map_err(|_| CryptoError::MalformedFrame("signature has the wrong length".to_string()))?;
        key.verify(&digest, &signature)
            .map_err(|_| CryptoError::SignatureMismatch(identity.to_string()))
    }

    fn peer_key(&self, identity: &str) -> Result<VerifyingKey, CryptoError> {
        if let Some(key) = self.inner.peer_keys.get(identity) {
            return Ok(*key);
        }
        let dir = self
            .inner
            .key_dir
            .as_ref()
            .ok_or_else(|| CryptoError::KeyNotFound(identity.to_string()))?;
        let path = dir.join(format!("{}.pem", identity.to_lowercase()));
        let pem = std::fs::read_to_string(&path).map_err(|e| CryptoError::KeyIo {
            identity: identity.to_string(),
            path: path.display().to_string(),
            source: e,
        })?;
        let key = VerifyingKey::from_public_key_pem(&pem)
            .map_err(|_| CryptoError::InvalidKey(identity.to_string()))?;
        self.inner.peer_keys.insert(identity.to_string(), key);
        Ok(key)
    }
}
