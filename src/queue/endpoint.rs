//! `EndpointQueue` — one ordered FIFO of requests for one endpoint, backed
//! by durable storage (§4.3).

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::QueueError;
use super::request::ClientRequest;
use crate::store::DurableStore;
use crate::util::{QueueId, RequestId};

const STATUS_WAITING: &[u8] = b"waiting";
const STATUS_PROCESSING: &[u8] = b"processing";

/// Owned exclusively by the loop that holds it; no internal locking (§5).
pub struct EndpointQueue<S> {
    queue_id: QueueId,
    store: Arc<S>,
    order: VecDeque<(RequestId, DateTime<Utc>)>,
}

impl<S: DurableStore> EndpointQueue<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            queue_id: QueueId::new(),
            store,
            order: VecDeque::new(),
        }
    }

    pub fn queue_id(&self) -> QueueId {
        self.queue_id
    }

    fn key(&self, kind: &str, id: &RequestId) -> String {
        format!("broker:{}:request:{kind}:{id}", self.queue_id)
    }

    /// Arrival timestamp of the queue's head, without mutation.
    pub fn peek(&self) -> Result<(RequestId, DateTime<Utc>), QueueError> {
        self.order.front().copied().ok_or(QueueError::EmptyQueue)
    }

    /// Whether `id` is still waiting in this queue's in-memory ordering.
    /// `false` as soon as `pop` dequeues it, even though its durable record
    /// lives on with status `processing` until `remove` is called — use
    /// `get` for a containment check that accounts for that.
    pub fn contains(&self, id: &RequestId) -> bool {
        self.order.iter().any(|(i, _)| i == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub async fn append(&mut self, request: &ClientRequest) -> Result<(), QueueError> {
        let now = Utc::now();
        self.store
            .put(&self.key("content", &request.id), request.cached_data()?)
            .await?;
        self.store
            .put(&self.key("status", &request.id), STATUS_WAITING.to_vec())
            .await?;
        self.store
            .put(&self.key("timestamp", &request.id), now.timestamp().to_string().into_bytes())
            .await?;
        self.order.push_back((request.id, now));
        Ok(())
    }

    pub async fn pop(&mut self) -> Result<ClientRequest, QueueError> {
        let (id, _) = self.order.pop_front().ok_or(QueueError::EmptyQueue)?;
        let content = self
            .store
            .get(&self.key("content", &id))
            .await?
            .ok_or(QueueError::NotFound(id))?;
        self.store
            .put(&self.key("status", &id), STATUS_PROCESSING.to_vec())
            .await?;
        ClientRequest::from_cached(id, &content)
    }

    pub async fn get(&self, id: &RequestId) -> Result<ClientRequest, QueueError> {
        let content = self
            .store
            .get(&self.key("content", id))
            .await?
            .ok_or(QueueError::NotFound(*id))?;
        ClientRequest::from_cached(*id, &content)
    }

    /// Purges all three durable records and the in-memory entry if present.
    /// Must succeed silently whether or not `id` is still in memory.
    pub async fn remove(&mut self, id: &RequestId) -> Result<(), QueueError> {
        self.order.retain(|(i, _)| i != id);
        self.store.delete(&self.key("content", id)).await?;
        self.store.delete(&self.key("status", id)).await?;
        self.store.delete(&self.key("timestamp", id)).await?;
        Ok(())
    }
}
