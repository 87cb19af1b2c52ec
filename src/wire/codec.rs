//! Compact map serializer for payload frames (§4.1, §6).
//!
//! The payload is a binary-packed mapping with typed primitives: integers,
//! booleans, byte-strings, lists, maps. Field names are carried as string
//! keys; on the wire they serialize to the same bytes the original's
//! byte-string keys would.

use std::collections::{BTreeSet, HashMap};

use rmpv::Value;

use super::error::WireError;

/// A decoded or to-be-encoded wire payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame(pub Value);

impl Frame {
    /// Build a frame from `(key, value)` pairs.
    pub fn map(fields: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        let entries = fields
            .into_iter()
            .map(|(k, v)| (Value::String(k.into()), v))
            .collect();
        Self(Value::Map(entries))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let value =
            rmpv::decode::read_value(&mut &bytes[..]).map_err(|e| WireError::Decode(e.to_string()))?;
        if !value.is_map() {
            return Err(WireError::NotAMap);
        }
        Ok(Self(value))
    }

    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, &self.0).map_err(|e| WireError::Encode(e.to_string()))?;
        Ok(buf)
    }

    fn entries(&self) -> &[(Value, Value)] {
        match &self.0 {
            Value::Map(entries) => entries,
            _ => &[],
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries()
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.as_u64())
    }

    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        self.get(key).and_then(|v| v.as_slice())
    }

    pub fn get_str_map(&self, key: &str) -> Option<HashMap<String, String>> {
        let Value::Map(entries) = self.get(key)? else {
            return None;
        };
        Some(
            entries
                .iter()
                .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.as_str()?.to_string())))
                .collect(),
        )
    }

    pub fn get_bytes_map(&self, key: &str) -> Option<HashMap<String, Vec<u8>>> {
        let Value::Map(entries) = self.get(key)? else {
            return None;
        };
        Some(
            entries
                .iter()
                .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.as_slice()?.to_vec())))
                .collect(),
        )
    }

    pub fn get_str_list(&self, key: &str) -> Option<Vec<String>> {
        let Value::Array(items) = self.get(key)? else {
            return None;
        };
        items.iter().map(|v| v.as_str().map(str::to_string)).collect()
    }

    pub fn get_str_set(&self, key: &str) -> Option<BTreeSet<String>> {
        Some(self.get_str_list(key)?.into_iter().collect())
    }
}

pub fn str_map(map: &HashMap<String, String>) -> Value {
    Value::Map(
        map.iter()
            .map(|(k, v)| (Value::String(k.clone().into()), Value::String(v.clone().into())))
            .collect(),
    )
}

pub fn bytes_map(map: &HashMap<String, Vec<u8>>) -> Value {
    Value::Map(
        map.iter()
            .map(|(k, v)| (Value::String(k.clone().into()), Value::Binary(v.clone())))
            .collect(),
    )
}

pub fn str_list<'a>(items: impl IntoIterator<Item = &'a String>) -> Value {
    Value::Array(items.into_iter().map(|s| Value::String(s.clone().into())).collect())
}
