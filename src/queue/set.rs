//! `QueueSet` — `endpoint → EndpointQueue`, with cross-endpoint oldest-first
//! fairness selection (§4.4).

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::endpoint::EndpointQueue;
use super::error::QueueError;
use super::request::ClientRequest;
use crate::store::DurableStore;
use crate::util::RequestId;

pub struct QueueSet<S> {
    store: Arc<S>,
    queues: HashMap<String, EndpointQueue<S>>,
}

impl<S: DurableStore> QueueSet<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            queues: HashMap::new(),
        }
    }

    fn queue_for(&mut self, endpoint: &str) -> &mut EndpointQueue<S> {
        self.queues
            .entry(endpoint.to_string())
            .or_insert_with(|| EndpointQueue::new(Arc::clone(&self.store)))
    }

    pub async fn append(&mut self, request: ClientRequest) -> Result<(), QueueError> {
        let endpoint = request.endpoint.clone();
        self.queue_for(&endpoint).append(&request).await
    }

    /// Returns the non-empty queue among `endpoints` whose head has the
    /// oldest arrival timestamp, ties broken by endpoint name ascending, and
    /// pops it.
    pub async fn select(&mut self, endpoints: &BTreeSet<String>) -> Result<ClientRequest, QueueError> {
        let mut winner: Option<(String, chrono::DateTime<chrono::Utc>)> = None;
        for endpoint in endpoints {
            let queue = self.queue_for(endpoint);
            let Ok((_, ts)) = queue.peek() else {
                continue;
            };
            let better = match &winner {
                None => true,
                Some((current_endpoint, current_ts)) => {
                    ts < *current_ts || (ts == *current_ts && endpoint < current_endpoint)
                }
            };
            if better {
                winner = Some((endpoint.clone(), ts));
            }
        }
        let (endpoint, _) = winner.ok_or(QueueError::EmptyQueue)?;
        self.queue_for(&endpoint).pop().await
    }

    /// Store-backed: a request popped off `order` by `select` still answers
    /// here, since its durable record survives with status `processing`.
    pub async fn retrieve(&self, id: &RequestId) -> Result<ClientRequest, QueueError> {
        for queue in self.queues.values() {
            match queue.get(id).await {
                Ok(request) => return Ok(request),
                Err(QueueError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(QueueError::NotFound(*id))
    }

    /// Succeeds silently when `id` is absent everywhere; durable cleanup is
    /// keyed off whichever endpoint queue actually holds the record, not
    /// `order` membership.
    pub async fn remove(&mut self, id: &RequestId) -> Result<(), QueueError> {
        for queue in self.queues.values_mut() {
            match queue.get(id).await {
                Ok(_) => return queue.remove(id).await,
                Err(QueueError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
