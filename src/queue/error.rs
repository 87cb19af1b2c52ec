//! Errors from `EndpointQueue` and `QueueSet` (§4.3, §4.4).

use thiserror::Error;

use crate::store::StoreError;
use crate::util::RequestId;

#[derive(Debug, Error)]
pub enum QueueError {
    /// Control signal inside the dispatch path; never surfaced past the router (§7).
    #[error("queue is empty")]
    EmptyQueue,

    #[error("request not found: {0}")]
    NotFound(RequestId),

    #[error("durable store error: {0}")]
    Store(#[from] StoreError),

    #[error("corrupt durable record for {id}: {reason}")]
    CorruptRecord { id: RequestId, reason: String },
}
