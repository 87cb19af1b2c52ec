//! Single-shot request/reply helper over one `PeerSocket` (§4.9, §4.11).

use std::collections::HashMap;
use std::time::Duration;

use rmpv::Value;
use tokio::time::Instant;

use super::error::ClientError;
use crate::transport::PeerSocket;
use crate::wire::codec::{bytes_map, str_map};
use crate::wire::Frame;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// A decoded broker reply, or the neutral empty value returned on timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientResponse {
    pub status: u16,
    pub response: Value,
}

impl ClientResponse {
    fn empty() -> Self {
        Self {
            status: 0,
            response: Value::Nil,
        }
    }
}

/// Blocking, single-shot request/reply client. One `call` sends one request
/// and waits up to `timeout` for the matching reply; each instance is
/// good for exactly one in-flight call at a time.
pub struct Client<C> {
    socket: C,
    timeout: Duration,
}

impl<C: PeerSocket> Client<C> {
    pub fn new(socket: C, timeout: Duration) -> Self {
        Self { socket, timeout }
    }

    /// Send `{method, endpoint, parameters?, data?}` and wait for the reply.
    /// Returns a neutral empty value (status `0`, response `nil`) if no
    /// reply arrives before `timeout` elapses.
    pub async fn call(
        &mut self,
        method: impl Into<String>,
        endpoint: impl Into<String>,
        parameters: HashMap<String, String>,
        data: HashMap<String, Vec<u8>>,
    ) -> Result<ClientResponse, ClientError> {
        let mut fields: Vec<(&'static str, Value)> = vec![
            ("method", Value::String(method.into().into())),
            ("endpoint", Value::String(endpoint.into().into())),
        ];
        if !parameters.is_empty() {
            fields.push(("parameters", str_map(&parameters)));
        }
        if !data.is_empty() {
            fields.push(("data", bytes_map(&data)));
        }
        let payload = Frame::map(fields).encode()?;
        self.socket.send(payload).await?;

        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(bytes) = self.socket.try_recv().await? {
                let frame = Frame::decode(&bytes)?;
                let status = frame.get_u64("status").unwrap_or(0) as u16;
                let response = frame.get("response").cloned().unwrap_or(Value::Nil);
                return Ok(ClientResponse { status, response });
            }
            if Instant::now() >= deadline {
                return Ok(ClientResponse::empty());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    pub async fn get(&mut self, endpoint: impl Into<String>, parameters: HashMap<String, String>) -> Result<ClientResponse, ClientError> {
        self.call("GET", endpoint, parameters, HashMap::new()).await
    }

    pub async fn list(&mut self, endpoint: impl Into<String>, parameters: HashMap<String, String>) -> Result<ClientResponse, ClientError> {
        self.call("LIST", endpoint, parameters, HashMap::new()).await
    }

    pub async fn post(
        &mut self,
        endpoint: impl Into<String>,
        parameters: HashMap<String, String>,
        data: HashMap<String, Vec<u8>>,
    ) -> Result<ClientResponse, ClientError> {
        self.call("POST", endpoint, parameters, data).await
    }

    pub async fn patch(
        &mut self,
        endpoint: impl Into<String>,
        parameters: HashMap<String, String>,
        data: HashMap<String, Vec<u8>>,
    ) -> Result<ClientResponse, ClientError> {
        self.call("PATCH", endpoint, parameters, data).await
    }

    pub async fn delete(&mut self, endpoint: impl Into<String>, parameters: HashMap<String, String>) -> Result<ClientResponse, ClientError> {
        self.call("DELETE", endpoint, parameters, HashMap::new()).await
    }
}
