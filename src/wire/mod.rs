//! Multi-frame envelope framing and the compact map wire codec.

pub mod codec;
pub mod envelope;
pub mod error;

pub use codec::Frame;
pub use envelope::Envelope;
pub use error::WireError;
