//! In-memory `RoutedSocket`/`PeerSocket` pair backed by a `DashMap` registry,
//! following the lock-free registry idiom used for actor routing tables.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use super::error::TransportError;
use super::traits::{PeerSocket, RoutedSocket};
use crate::wire::Envelope;

type Chan = mpsc::UnboundedSender<Vec<Vec<u8>>>;

/// Shared registry connecting bound router addresses to connected dealer
/// identities. Cheap to clone via `Arc`.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    registry: Arc<DashMap<Vec<u8>, Chan>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_router(&self, address: impl Into<Vec<u8>>) -> InMemoryRouterSocket {
        let address = address.into();
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry.insert(address, tx);
        InMemoryRouterSocket {
            registry: Arc::clone(&self.registry),
            receiver: rx,
        }
    }

    pub fn connect_dealer(&self, address: impl Into<Vec<u8>>, identity: impl Into<Vec<u8>>) -> InMemoryDealerSocket {
        let identity = identity.into();
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry.insert(identity.clone(), tx);
        InMemoryDealerSocket {
            registry: Arc::clone(&self.registry),
            receiver: rx,
            address: address.into(),
            identity,
        }
    }
}

pub struct InMemoryRouterSocket {
    registry: Arc<DashMap<Vec<u8>, Chan>>,
    receiver: mpsc::UnboundedReceiver<Vec<Vec<u8>>>,
}

#[async_trait]
impl RoutedSocket for InMemoryRouterSocket {
    async fn try_recv(&mut self) -> Result<Option<Envelope>, TransportError> {
        match self.receiver.try_recv() {
            Ok(frames) => Ok(Some(Envelope::parse(frames)?)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Closed),
        }
    }

    async fn send_to(&mut self, destination: &[Vec<u8>], payload: Vec<u8>) -> Result<(), TransportError> {
        let identity = destination.first().ok_or(TransportError::UnknownDestination)?;
        let sender = self
            .registry
            .get(identity)
            .ok_or(TransportError::UnknownDestination)?
            .clone();
        sender.send(vec![payload]).map_err(|_| TransportError::Closed)
    }
}

pub struct InMemoryDealerSocket {
    registry: Arc<DashMap<Vec<u8>, Chan>>,
    receiver: mpsc::UnboundedReceiver<Vec<Vec<u8>>>,
    address: Vec<u8>,
    identity: Vec<u8>,
}

#[async_trait]
impl PeerSocket for InMemoryDealerSocket {
    async fn try_recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        match self.receiver.try_recv() {
            Ok(mut frames) => Ok(frames.pop()),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Closed),
        }
    }

    async fn send(&mut self, payload: Vec<u8>) -> Result<(), TransportError> {
        let sender = self
            .registry
            .get(&self.address)
            .ok_or(TransportError::UnknownDestination)?
            .clone();
        let frames = Envelope::frames_for(&[self.identity.clone()], payload);
        sender.send(frames).map_err(|_| TransportError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dealer_send_reaches_router_with_identity() {
        let transport = InMemoryTransport::new();
        let mut router = transport.bind_router(b"client".to_vec());
        let mut dealer = transport.connect_dealer(b"client".to_vec(), b"peer-1".to_vec());

        dealer.send(b"hello".to_vec()).await.expect("send");
        let envelope = router.try_recv().await.expect("recv").expect("present");
        assert_eq!(envelope.source, vec![b"peer-1".to_vec()]);
        assert_eq!(envelope.payload, b"hello");
    }

    #[tokio::test]
    async fn test_router_send_to_reaches_dealer() {
        let transport = InMemoryTransport::new();
        let mut router = transport.bind_router(b"client".to_vec());
        let mut dealer = transport.connect_dealer(b"client".to_vec(), b"peer-1".to_vec());

        router
            .send_to(&[b"peer-1".to_vec()], b"reply".to_vec())
            .await
            .expect("send_to");
        let payload = dealer.try_recv().await.expect("recv").expect("present");
        assert_eq!(payload, b"reply");
    }

    #[tokio::test]
    async fn test_try_recv_empty_returns_none() {
        let transport = InMemoryTransport::new();
        let mut router = transport.bind_router(b"client".to_vec());
        assert!(router.try_recv().await.expect("recv").is_none());
    }

    #[tokio::test]
    async fn test_send_to_unknown_destination_errors() {
        let transport = InMemoryTransport::new();
        let mut router = transport.bind_router(b"client".to_vec());
        let err = router
            .send_to(&[b"ghost".to_vec()], b"x".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::UnknownDestination));
    }
}
