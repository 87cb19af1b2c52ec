//! Multi-frame envelope parsing and emission (§4.1).
//!
//! `[source_frames…, empty_frame, payload_frame]`. On ingress the routing
//! prefix is every frame up to (not including) the first empty frame; the
//! payload is the single frame after it.

use super::error::WireError;

/// One parsed multi-frame message arriving on a routed socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Routing prefix identifying the originating connection.
    pub source: Vec<Vec<u8>>,
    /// The single payload frame.
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(source: Vec<Vec<u8>>, payload: Vec<u8>) -> Self {
        Self { source, payload }
    }

    /// Parse raw frames received from a routed socket.
    pub fn parse(frames: Vec<Vec<u8>>) -> Result<Self, WireError> {
        let separator = frames
            .iter()
            .position(|f| f.is_empty())
            .ok_or(WireError::MissingSeparator)?;

        let source = frames[..separator].to_vec();
        let rest = &frames[separator + 1..];

        match rest.len() {
            0 => Err(WireError::NoPayloadFrame),
            1 => Ok(Self {
                source,
                payload: rest[0].clone(),
            }),
            n => Err(WireError::TooManyPayloadFrames(n)),
        }
    }

    /// Frames to send back to this envelope's originator.
    pub fn reply_frames(&self, payload: Vec<u8>) -> Vec<Vec<u8>> {
        Self::frames_for(&self.source, payload)
    }

    /// Frames to send to an arbitrary destination's routing prefix.
    pub fn frames_for(destination: &[Vec<u8>], payload: Vec<u8>) -> Vec<Vec<u8>> {
        let mut out = Vec::with_capacity(destination.len() + 2);
        out.extend(destination.iter().cloned());
        out.push(Vec::new());
        out.push(payload);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_source_frame() {
        let frames = vec![b"worker-1".to_vec(), Vec::new(), b"payload".to_vec()];
        let envelope = Envelope::parse(frames).expect("should parse");
        assert_eq!(envelope.source, vec![b"worker-1".to_vec()]);
        assert_eq!(envelope.payload, b"payload".to_vec());
    }

    #[test]
    fn test_parse_multi_source_frames() {
        let frames = vec![b"a".to_vec(), b"b".to_vec(), Vec::new(), b"payload".to_vec()];
        let envelope = Envelope::parse(frames).expect("should parse");
        assert_eq!(envelope.source, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_parse_missing_separator() {
        let frames = vec![b"a".to_vec(), b"payload".to_vec()];
        assert!(matches!(
            Envelope::parse(frames),
            Err(WireError::MissingSeparator)
        ));
    }

    #[test]
    fn test_parse_no_payload_frame() {
        let frames = vec![b"a".to_vec(), Vec::new()];
        assert!(matches!(
            Envelope::parse(frames),
            Err(WireError::NoPayloadFrame)
        ));
    }

    #[test]
    fn test_parse_too_many_payload_frames() {
        let frames = vec![b"a".to_vec(), Vec::new(), b"p1".to_vec(), b"p2".to_vec()];
        assert!(matches!(
            Envelope::parse(frames),
            Err(WireError::TooManyPayloadFrames(2))
        ));
    }

    #[test]
    fn test_reply_frames_roundtrip() {
        let frames = vec![b"client-9".to_vec(), Vec::new(), b"req".to_vec()];
        let envelope = Envelope::parse(frames).expect("should parse");
        let reply = envelope.reply_frames(b"resp".to_vec());
        let reparsed = Envelope::parse(reply).expect("should parse");
        assert_eq!(reparsed.source, envelope.source);
        assert_eq!(reparsed.payload, b"resp");
    }
}
