//! Abstract routable-socket transport, with in-memory and TCP implementations.

pub mod error;
pub mod in_memory;
pub mod tcp;
pub mod traits;

pub use error::TransportError;
pub use in_memory::{InMemoryDealerSocket, InMemoryRouterSocket, InMemoryTransport};
pub use tcp::{TcpDealerSocket, TcpRouterSocket};
pub use traits::{PeerSocket, RoutedSocket};
