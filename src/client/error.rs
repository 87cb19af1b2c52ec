//! Client-side error type.

use thiserror::Error;

use crate::transport::TransportError;
use crate::wire::WireError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("framing error: {0}")]
    Wire(#[from] WireError),
}
