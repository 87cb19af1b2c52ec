//! Utility types and helpers shared across the broker and worker.

pub mod ids;
pub mod serde_helpers;
pub mod timestamp;

pub use ids::{QueueId, RequestId, WorkerId};
pub use serde_helpers::duration_serde;
pub use timestamp::{ts_to_unix, unix_to_ts};
