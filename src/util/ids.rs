// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Broker-minted identifier for one `ClientRequest`.
///
/// Rendered on the wire as a 32-character lowercase hex string (no dashes),
/// matching the `id` field contract in the framing layer.
///
/// # Example
/// ```rust
/// use nimbus::util::RequestId;
///
/// let id1 = RequestId::new();
/// let id2 = RequestId::new();
/// assert_ne!(id1, id2);
/// assert_eq!(id1.to_string().len(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random request id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a 32-hex-character id as produced by `Display`.
    pub fn parse(hex: &str) -> Option<Self> {
        Uuid::parse_str(hex).ok().map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Identifier for one `EndpointQueue` instance.
///
/// Minted fresh every time a queue is created so that durable keys left
/// behind by a crashed predecessor queue can never collide with a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueId(Uuid);

impl QueueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QueueId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Opaque connection routing identity for a worker, as handed back by the
/// transport layer's routed socket on the first frame of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(Vec<u8>);

impl WorkerId {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Best-effort human-readable form, used as the crypto identity when
    /// looking up the peer's public key file. Transport identities are not
    /// guaranteed UTF-8, so this falls back to hex.
    pub fn identity_str(&self) -> String {
        match std::str::from_utf8(&self.0) {
            Ok(s) => s.to_string(),
            Err(_) => self.0.iter().map(|b| format!("{b:02x}")).collect(),
        }
    }
}

impl Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity_str())
    }
}
