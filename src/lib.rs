//! # nimbus - Request-Routing Message Broker
//!
//! Nimbus sits between many untrusted clients and a dynamic pool of worker
//! processes. Clients send method/endpoint-addressed requests; the broker
//! enqueues them per endpoint and dispatches each to a worker that has
//! advertised capability for that endpoint, then returns the worker's
//! response to the originating client. Workers come and go, may crash
//! silently, and are policed by heartbeat. Requests are persisted to a
//! pluggable key/value store so that a crashed broker can resume without
//! losing in-flight work.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use nimbus::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = HandlerRegistry::builder().build();
//!     let config = WorkerConfig::builder()
//!         .control_addr("tcp://127.0.0.1:5556")
//!         .response_addr("tcp://127.0.0.1:5557")
//!         .build()?;
//!
//!     // let mut worker = WorkerLoop::new(control_socket, response_socket,
//!     //     Arc::new(registry), KeyStore::unsigned(), NoopMonitor::new(), config);
//!     // worker.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Core Components
//!
//! - [`wire`] - Multi-frame envelope parsing and the compact-map payload codec (§4.1).
//! - [`crypto`] - Optional per-message signing: key storage and the signed wrapper (§4.1).
//! - [`store`] - `DurableStore` trait and its in-memory implementation (§4.2).
//! - [`queue`] - `EndpointQueue`/`QueueSet`: per-endpoint FIFO with cross-endpoint fairness (§4.3, §4.4).
//! - [`router`] - `RequestRouter`: ties queues, worker registrations, and the durable store together (§4.5).
//! - [`liveness`] - `LivenessMonitor`: probe/disconnect heartbeat transitions, shared by broker and worker (§4.6).
//! - [`transport`] - `RoutedSocket`/`PeerSocket` abstractions, with in-memory and TCP implementations (§6).
//! - [`broker`] - `BrokerLoop`: the client-to-worker dispatch event loop (§4.7).
//! - [`worker`] - `WorkerLoop`, `HandlerRegistry`, and the handler-facing error types (§4.8, §4.10).
//! - [`client`] - Blocking single-shot request/reply helper (§4.9, §4.11).
//! - [`monitoring`] - Event tracking for observability, parallel to the teacher runtime's monitoring module.
//! - [`util`] - Identifiers (`RequestId`, `QueueId`, `WorkerId`) and small shared helpers.
//!
//! # Concurrency Model
//!
//! Both [`broker::BrokerLoop`] and [`worker::WorkerLoop`] run as a single
//! cooperative event loop with no internal threads of their own; all
//! application-visible state is owned exclusively by the loop and mutated
//! only between socket operations, so no locking is needed on it (§5).
//!
//! # Standards
//!
//! - 3-layer import organization (std → third-party → internal), matching the
//!   conventions this crate's module layout was grounded on.
//! - `chrono::DateTime<Utc>` for all timestamps.
//! - `thiserror` enums for all fallible module boundaries; no stringly-typed errors.

pub mod broker;
pub mod client;
pub mod crypto;
pub mod liveness;
pub mod monitoring;
pub mod prelude;
pub mod queue;
pub mod router;
pub mod store;
pub mod transport;
pub mod util;
pub mod wire;
pub mod worker;

pub use broker::{BrokerConfig, BrokerConfigBuilder, BrokerError, BrokerLoop};
pub use client::{Client, ClientError, ClientResponse};
pub use crypto::{CryptoError, KeyStore};
pub use liveness::LivenessMonitor;
pub use monitoring::{
    BrokerEvent, BrokerEventKind, EventSeverity, InMemoryMonitor, LivenessEvent, LivenessEventKind,
    Monitor, MonitoringConfig, MonitoringError, MonitoringEvent, MonitoringSnapshot, NoopMonitor,
    QueueEvent, QueueEventKind, WorkerEvent, WorkerEventKind,
};
pub use queue::{ClientRequest, EndpointQueue, QueueError, QueueSet};
pub use router::{RequestRouter, RouterError};
pub use store::{DurableStore, InMemoryStore, StoreError};
pub use transport::{PeerSocket, RoutedSocket, TransportError};
pub use util::{QueueId, RequestId, WorkerId};
pub use wire::{Envelope, Frame, WireError};
pub use worker::{
    Handler, HandlerError, HandlerRegistry, HandlerRegistryBuilder, HandlerResponse, RequestError,
    WorkerConfig, WorkerConfigBuilder, WorkerError, WorkerLoop, WorkerRequest,
};
