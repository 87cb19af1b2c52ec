//! Optional per-message signing and key-material loading (§4.1).

pub mod error;
pub mod keystore;
pub mod signed;

pub use error::CryptoError;
pub use keystore::KeyStore;
pub use signed::{unwrap, wrap};
