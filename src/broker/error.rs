//! Broker-wide error type aggregating every subsystem `BrokerLoop` touches.

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::queue::QueueError;
use crate::router::RouterError;
use crate::transport::TransportError;
use crate::util::RequestId;
use crate::wire::WireError;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("routing error: {0}")]
    Router(#[from] RouterError),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("framing error: {0}")]
    Wire(#[from] WireError),

    #[error("no client request found for response id {0}")]
    UnknownRequest(RequestId),
}
