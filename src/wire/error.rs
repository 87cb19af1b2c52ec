//! Errors from framing and the compact-map wire codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    /// The envelope had no empty-frame separator between routing prefix and payload.
    #[error("envelope missing empty-frame separator")]
    MissingSeparator,

    /// Zero frames followed the empty-frame separator.
    #[error("envelope has no payload frame")]
    NoPayloadFrame,

    /// More than one frame followed the empty-frame separator.
    #[error("envelope has {0} payload frames, exactly one is required")]
    TooManyPayloadFrames(usize),

    #[error("failed to decode msgpack payload: {0}")]
    Decode(String),

    #[error("failed to encode msgpack payload: {0}")]
    Encode(String),

    #[error("payload is not a map")]
    NotAMap,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {0} has the wrong type")]
    WrongFieldType(&'static str),
}
