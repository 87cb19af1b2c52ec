//! Worker-wide error type.

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::transport::TransportError;
use crate::wire::WireError;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("framing error: {0}")]
    Wire(#[from] WireError),

    /// The broker never answered a liveness probe within `T_disconnect`;
    /// per §4.8 the loop terminates rather than retrying silently.
    #[error("broker did not respond to liveness probe before the disconnect grace period elapsed")]
    BrokerDisconnected,
}
