//! Transport-layer errors.

use thiserror::Error;

use crate::wire::WireError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("routed socket closed")]
    Closed,

    #[error("no connection registered for destination")]
    UnknownDestination,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("framing error: {0}")]
    Wire(#[from] WireError),
}
