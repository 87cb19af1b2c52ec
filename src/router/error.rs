//! Errors from `RequestRouter` (§4.5).

use thiserror::Error;

use crate::queue::QueueError;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}
