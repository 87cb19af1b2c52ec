//! # Monitoring Module
//!
//! Universal monitoring infrastructure for observing and tracking events across all runtime components.
//!
//! ## Features
//! - **Generic Monitor<E> Trait**: Universal monitoring for any entity type
//! - **Zero-Cost Abstraction**: NoopMonitor compiles away when disabled
//! - **Lock-Free Recording**: Atomic counters for concurrent event tracking
//! - **Type Safety**: MonitoringEvent trait ensures compile-time correctness
//!
//! ## Event Types
//! - `BrokerEvent`: BrokerLoop operations (enqueue, dispatch, registration, heartbeat)
//! - `WorkerEvent`: WorkerLoop handler invocations and readiness transitions
//! - `LivenessEvent`: LivenessMonitor contact/probe/disconnect transitions
//! - `QueueEvent`: EndpointQueue/QueueSet mutations
//!
//! ## Examples
//! ```rust,ignore
//! use nimbus::monitoring::{InMemoryMonitor, MonitoringConfig, QueueEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitoringConfig::default();
//! let monitor = InMemoryMonitor::new(config);
//!
//! // Record events
//! // monitor.record(event).await?;
//!
//! // Take snapshots
//! // let snapshot = monitor.snapshot().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod in_memory;
pub mod noop;
pub mod traits;
pub mod types;

pub use error::MonitoringError;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{
    BrokerEvent, BrokerEventKind, LivenessEvent, LivenessEventKind, MonitoringConfig,
    MonitoringSnapshot, QueueEvent, QueueEventKind, WorkerEvent, WorkerEventKind,
};
