//! `ClientRequest` — the entity created when a client frame arrives (§3).

use std::collections::HashMap;

use rmpv::Value;
use serde::{Deserialize, Serialize};

use super::error::QueueError;
use crate::util::RequestId;
use crate::wire::codec::{bytes_map, str_map};
use crate::wire::Frame;

/// A single client request in flight.
///
/// `id`, `source`, `method`, and `endpoint` are immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientRequest {
    pub id: RequestId,
    pub source: Vec<Vec<u8>>,
    pub method: String,
    pub endpoint: String,
    pub parameters: HashMap<String, String>,
    pub data: HashMap<String, Vec<u8>>,
}

impl ClientRequest {
    pub fn new(
        id: RequestId,
        source: Vec<Vec<u8>>,
        method: impl Into<String>,
        endpoint: impl Into<String>,
        parameters: HashMap<String, String>,
        data: HashMap<String, Vec<u8>>,
    ) -> Self {
        Self {
            id,
            source,
            method: method.into(),
            endpoint: endpoint.into(),
            parameters,
            data,
        }
    }

    /// Encode `{source, content: {method, endpoint, parameters, data}}` for the
    /// durable `content` record, mirroring `ClientRequest.cached_data` in the
    /// original implementation so `source` survives a broker restart.
    pub fn cached_data(&self) -> Result<Vec<u8>, QueueError> {
        let content = Frame::map([
            ("method", Value::String(self.method.clone().into())),
            ("endpoint", Value::String(self.endpoint.clone().into())),
            ("parameters", str_map(&self.parameters)),
            ("data", bytes_map(&self.data)),
        ]);
        let source = Value::Array(self.source.iter().cloned().map(Value::Binary).collect());
        let outer = Frame::map([("source", source), ("content", content.0)]);
        outer.encode().map_err(|e| QueueError::CorruptRecord {
            id: self.id,
            reason: e.to_string(),
        })
    }

    /// Reconstruct a request from its cached durable record.
    pub fn from_cached(id: RequestId, bytes: &[u8]) -> Result<Self, QueueError> {
        let corrupt = |reason: String| QueueError::CorruptRecord { id, reason };

        let outer = Frame::decode(bytes).map_err(|e| corrupt(e.to_string()))?;
        let source = match outer.get("source") {
            Some(Value::Array(frames)) => frames
                .iter()
                .map(|v| v.as_slice().map(<[u8]>::to_vec))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| corrupt("source frame is not bytes".to_string()))?,
            _ => return Err(corrupt("missing source field".to_string())),
        };

        let content = Frame(
            outer
                .get("content")
                .cloned()
                .ok_or_else(|| corrupt("missing content field".to_string()))?,
        );
        let method = content
            .get_str("method")
            .ok_or_else(|| corrupt("missing method field".to_string()))?
            .to_string();
        let endpoint = content
            .get_str("endpoint")
            .ok_or_else(|| corrupt("missing endpoint field".to_string()))?
            .to_string();
        let parameters = content.get_str_map("parameters").unwrap_or_default();
        let data = content.get_bytes_map("data").unwrap_or_default();

        Ok(Self {
            id,
            source,
            method,
            endpoint,
            parameters,
            data,
        })
    }
}
