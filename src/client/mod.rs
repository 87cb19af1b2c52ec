//! Blocking single-shot request/reply client (§4.9, §4.11).

pub mod client;
pub mod error;

pub use client::{Client, ClientResponse};
pub use error::ClientError;
