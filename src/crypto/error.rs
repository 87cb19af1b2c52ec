//! Errors from signing, verification, and key-material loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("no public key found for peer: {0}")]
    KeyNotFound(String),

    #[error("could not read key material for {identity} from {path}: {source}")]
    KeyIo {
        identity: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid key material for {0}")]
    InvalidKey(String),

    #[error("signature verification failed for peer: {0}")]
    SignatureMismatch(String),

    #[error("signed frame is malformed: {0}")]
    MalformedFrame(String),
}
