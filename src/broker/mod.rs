//! `BrokerLoop` and its configuration — the request-routing half of Nimbus
//! (§4.7). Binds client, worker-control, and worker-response sockets and
//! drives `RequestRouter`/`LivenessMonitor` through the fixed per-iteration
//! algorithm.

pub mod broker_loop;
pub mod config;
pub mod error;

pub use broker_loop::BrokerLoop;
pub use config::{BrokerConfig, BrokerConfigBuilder};
pub use error::BrokerError;
