//! TCP `RoutedSocket`/`PeerSocket` pair over `tokio-util`'s length-delimited
//! codec: one frame on the wire is one payload.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use uuid::Uuid;

use super::error::TransportError;
use super::traits::{PeerSocket, RoutedSocket};
use crate::wire::Envelope;

pub struct TcpRouterSocket {
    connections: Arc<DashMap<Vec<u8>, mpsc::UnboundedSender<Vec<u8>>>>,
    inbox: mpsc::UnboundedReceiver<Envelope>,
    local_addr: std::net::SocketAddr,
}

impl TcpRouterSocket {
    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.local_addr
    }

    /// Binds a listener and spawns the accept loop. Each accepted connection
    /// is assigned a random routing identity, the ROUTER-style analogue of a
    /// DEALER's handshake identity.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let connections: Arc<DashMap<Vec<u8>, mpsc::UnboundedSender<Vec<u8>>>> = Arc::new(DashMap::new());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let accept_connections = Arc::clone(&connections);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let identity = Uuid::new_v4().as_bytes().to_vec();
                let framed = Framed::new(stream, LengthDelimitedCodec::new());
                let (mut sink, mut stream) = framed.split();

                let (write_tx, mut write_rx) = mpsc::unbounded_channel::<Vec<u8>>();
                accept_connections.insert(identity.clone(), write_tx);

                tokio::spawn(async move {
                    while let Some(payload) = write_rx.recv().await {
                        if sink.send(Bytes::from(payload)).await.is_err() {
                            break;
                        }
                    }
                });

                let inbox_tx = inbox_tx.clone();
                let read_identity = identity.clone();
                tokio::spawn(async move {
                    while let Some(Ok(bytes)) = stream.next().await {
                        let envelope = Envelope::new(vec![read_identity.clone()], bytes.to_vec());
                        if inbox_tx.send(envelope).is_err() {
                            break;
                        }
                    }
                });
            }
        });

        Ok(Self {
            connections,
            inbox: inbox_rx,
            local_addr,
        })
    }
}

#[async_trait]
impl RoutedSocket for TcpRouterSocket {
    async fn try_recv(&mut self) -> Result<Option<Envelope>, TransportError> {
        match self.inbox.try_recv() {
            Ok(envelope) => Ok(Some(envelope)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Closed),
        }
    }

    async fn send_to(&mut self, destination: &[Vec<u8>], payload: Vec<u8>) -> Result<(), TransportError> {
        let identity = destination.first().ok_or(TransportError::UnknownDestination)?;
        let sender = self
            .connections
            .get(identity)
            .ok_or(TransportError::UnknownDestination)?
            .clone();
        sender.send(payload).map_err(|_| TransportError::Closed)
    }
}

pub struct TcpDealerSocket {
    inbox: mpsc::UnboundedReceiver<Vec<u8>>,
    outbox: mpsc::UnboundedSender<Vec<u8>>,
}

impl TcpDealerSocket {
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr).await?;
        let framed = Framed::new(stream, LengthDelimitedCodec::new());
        let (mut sink, mut stream) = framed.split();

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(Ok(bytes)) = stream.next().await {
                if inbox_tx.send(bytes.to_vec()).is_err() {
                    break;
                }
            }
        });

        let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        tokio::spawn(async move {
            while let Some(payload) = outbox_rx.recv().await {
                if sink.send(Bytes::from(payload)).await.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            inbox: inbox_rx,
            outbox: outbox_tx,
        })
    }
}

#[async_trait]
impl PeerSocket for TcpDealerSocket {
    async fn try_recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        match self.inbox.try_recv() {
            Ok(payload) => Ok(Some(payload)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Closed),
        }
    }

    async fn send(&mut self, payload: Vec<u8>) -> Result<(), TransportError> {
        self.outbox.send(payload).map_err(|_| TransportError::Closed)
    }
}
