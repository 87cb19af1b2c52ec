//! Errors from the durable key/value store (§4.2).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("durable store backend error: {0}")]
    Backend(String),
}
