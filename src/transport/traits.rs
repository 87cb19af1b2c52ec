//! Abstract routable-socket traits (§6). `RoutedSocket` is the ROUTER-style
//! socket the broker binds (many peers, addressed by routing identity);
//! `PeerSocket` is the symmetric dealer-style socket the worker connects
//! with (one peer, no addressing needed).

use async_trait::async_trait;

use super::error::TransportError;
use crate::wire::Envelope;

#[async_trait]
pub trait RoutedSocket: Send {
    /// Non-blocking poll for one envelope. `Ok(None)` means nothing was
    /// ready; the caller supplies its own timeout/backoff between calls.
    async fn try_recv(&mut self) -> Result<Option<Envelope>, TransportError>;

    /// Send `payload` to `destination`'s routing prefix.
    async fn send_to(&mut self, destination: &[Vec<u8>], payload: Vec<u8>) -> Result<(), TransportError>;
}

#[async_trait]
pub trait PeerSocket: Send {
    async fn try_recv(&mut self) -> Result<Option<Vec<u8>>, TransportError>;

    async fn send(&mut self, payload: Vec<u8>) -> Result<(), TransportError>;
}
