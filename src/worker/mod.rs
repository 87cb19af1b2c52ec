//! `WorkerLoop` and its supporting types — the handler-dispatch half of
//! Nimbus (§4.8, §4.10). Binds control and response sockets to the broker,
//! maintains its own handshake/heartbeat state, and dispatches decoded
//! requests through a statically built `HandlerRegistry`.

pub mod config;
pub mod error;
pub mod errors;
pub mod handler;
pub mod worker_loop;

pub use config::{WorkerConfig, WorkerConfigBuilder};
pub use error::WorkerError;
pub use errors::{HandlerError, RequestError};
pub use handler::{Handler, HandlerRegistry, HandlerRegistryBuilder, HandlerResponse, WorkerRequest};
pub use worker_loop::WorkerLoop;
