//! Prelude module for convenient imports.
//!
//! Re-exports the types most call sites need to wire up a broker or worker
//! loop. Import this module to get started quickly:
//!
//! ```rust
//! use nimbus::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Framing & Crypto
//! - [`Frame`] / [`Envelope`] - payload codec and multi-frame envelope
//! - [`KeyStore`] - signing-key cache used by the signed wrapper
//!
//! ## Durability & Queueing
//! - [`DurableStore`] / [`InMemoryStore`] - crash-recoverable key/value storage
//! - [`EndpointQueue`] / [`QueueSet`] / [`ClientRequest`]
//!
//! ## Routing & Liveness
//! - [`RequestRouter`] - queue/registration/dispatch coordination
//! - [`LivenessMonitor`] - probe/disconnect heartbeat transitions
//!
//! ## Transport
//! - [`RoutedSocket`] / [`PeerSocket`] - the broker- and worker-side socket traits
//!
//! ## Broker & Worker
//! - [`BrokerLoop`] / [`BrokerConfig`]
//! - [`WorkerLoop`] / [`WorkerConfig`] / [`HandlerRegistry`] / [`Handler`]
//!
//! ## Client
//! - [`Client`] - blocking single-shot request/reply helper
//!
//! ## Monitoring
//! - [`Monitor`] / [`InMemoryMonitor`] / [`NoopMonitor`] / [`MonitoringEvent`]

// Framing & crypto
pub use crate::crypto::KeyStore;
pub use crate::wire::{Envelope, Frame};

// Durability & queueing
pub use crate::queue::{ClientRequest, EndpointQueue, QueueSet};
pub use crate::store::{DurableStore, InMemoryStore};

// Routing & liveness
pub use crate::liveness::LivenessMonitor;
pub use crate::router::RequestRouter;

// Transport
pub use crate::transport::{PeerSocket, RoutedSocket};

// Broker
pub use crate::broker::{BrokerConfig, BrokerLoop};

// Worker
pub use crate::worker::{Handler, HandlerRegistry, WorkerConfig, WorkerLoop};

// Client
pub use crate::client::Client;

// Monitoring
pub use crate::monitoring::{EventSeverity, InMemoryMonitor, Monitor, MonitoringEvent, NoopMonitor};
