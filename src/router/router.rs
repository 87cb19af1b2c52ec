//! `RequestRouter` — tracks worker registrations, readiness, and matches
//! ready workers to queued work (§4.5).

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use super::error::RouterError;
use super::registration::WorkerRegistration;
use crate::queue::{ClientRequest, QueueSet};
use crate::store::DurableStore;
use crate::util::{RequestId, WorkerId};

pub struct RequestRouter<S> {
    endpoints_by_worker: HashMap<WorkerId, BTreeSet<String>>,
    ready_workers: HashSet<WorkerId>,
    queues: QueueSet<S>,
}

impl<S: DurableStore> RequestRouter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            endpoints_by_worker: HashMap::new(),
            ready_workers: HashSet::new(),
            queues: QueueSet::new(store),
        }
    }

    /// Idempotent: re-registration replaces the prior endpoint set and marks
    /// the worker ready (§9 Open Question resolution).
    pub fn register(&mut self, worker_id: WorkerId, endpoints: BTreeSet<String>) {
        self.endpoints_by_worker.insert(worker_id.clone(), endpoints);
        self.ready_workers.insert(worker_id);
    }

    pub fn unregister(&mut self, worker_id: &WorkerId) {
        self.endpoints_by_worker.remove(worker_id);
        self.ready_workers.remove(worker_id);
    }

    pub fn mark_ready(&mut self, worker_id: WorkerId) {
        self.ready_workers.insert(worker_id);
    }

    pub fn is_registered(&self, worker_id: &WorkerId) -> bool {
        self.endpoints_by_worker.contains_key(worker_id)
    }

    pub async fn enqueue(&mut self, request: ClientRequest) -> Result<(), RouterError> {
        Ok(self.queues.append(request).await?)
    }

    pub async fn retrieve(&self, id: &RequestId) -> Result<ClientRequest, RouterError> {
        Ok(self.queues.retrieve(id).await?)
    }

    pub async fn remove(&mut self, id: &RequestId) -> Result<(), RouterError> {
        Ok(self.queues.remove(id).await?)
    }

    /// Matches each currently-ready worker (snapshot taken at entry) to one
    /// request. A worker with no eligible request stays ready; one appears at
    /// most once in the output.
    pub async fn dispatch(&mut self) -> Result<Vec<(WorkerId, ClientRequest)>, RouterError> {
        let snapshot: Vec<WorkerId> = self.ready_workers.drain().collect();
        let mut dispatched = Vec::new();

        for worker_id in snapshot {
            let Some(endpoints) = self.endpoints_by_worker.get(&worker_id) else {
                continue;
            };
            match self.queues.select(endpoints).await {
                Ok(request) => dispatched.push((worker_id, request)),
                Err(crate::queue::QueueError::EmptyQueue) => {
                    self.ready_workers.insert(worker_id);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(dispatched)
    }

    pub fn registrations(&self) -> Vec<WorkerRegistration> {
        self.endpoints_by_worker
            .iter()
            .map(|(worker_id, endpoints)| WorkerRegistration {
                worker_id: worker_id.clone(),
                endpoints: endpoints.clone(),
                ready: self.ready_workers.contains(worker_id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn request(endpoint: &str) -> ClientRequest {
        ClientRequest::new(
            RequestId::new(),
            vec![b"client".to_vec()],
            "GET",
            endpoint,
            Default::default(),
            Default::default(),
        )
    }

    fn endpoints(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_register_then_dispatch() {
        let mut router = RequestRouter::new(Arc::new(InMemoryStore::new()));
        let worker = WorkerId::from_bytes(b"w1".to_vec());
        router.register(worker.clone(), endpoints(&["a"]));

        let r = request("a");
        router.enqueue(r.clone()).await.expect("enqueue");

        let dispatched = router.dispatch().await.expect("dispatch");
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].0, worker);
        assert_eq!(dispatched[0].1.id, r.id);
    }

    #[tokio::test]
    async fn test_dispatch_leaves_worker_without_match_ready() {
        let mut router: RequestRouter<InMemoryStore> = RequestRouter::new(Arc::new(InMemoryStore::new()));
        let worker = WorkerId::from_bytes(b"w1".to_vec());
        router.register(worker.clone(), endpoints(&["a"]));

        let dispatched = router.dispatch().await.expect("dispatch");
        assert!(dispatched.is_empty());
        assert!(router.registrations().iter().any(|r| r.worker_id == worker && r.ready));
    }

    #[tokio::test]
    async fn test_dispatch_no_worker_appears_twice() {
        let mut router = RequestRouter::new(Arc::new(InMemoryStore::new()));
        let worker = WorkerId::from_bytes(b"w1".to_vec());
        router.register(worker.clone(), endpoints(&["a"]));
        router.enqueue(request("a")).await.expect("enqueue");
        router.enqueue(request("a")).await.expect("enqueue");

        let dispatched = router.dispatch().await.expect("dispatch");
        assert_eq!(dispatched.len(), 1);
    }

    #[tokio::test]
    async fn test_reregistration_is_idempotent() {
        let mut router: RequestRouter<InMemoryStore> = RequestRouter::new(Arc::new(InMemoryStore::new()));
        let worker = WorkerId::from_bytes(b"w1".to_vec());
        router.register(worker.clone(), endpoints(&["a"]));
        router.register(worker.clone(), endpoints(&["b"]));

        let regs = router.registrations();
        let reg = regs.iter().find(|r| r.worker_id == worker).expect("registered");
        assert_eq!(reg.endpoints, endpoints(&["b"]));
    }

    #[tokio::test]
    async fn test_unregister_removes_worker() {
        let mut router: RequestRouter<InMemoryStore> = RequestRouter::new(Arc::new(InMemoryStore::new()));
        let worker = WorkerId::from_bytes(b"w1".to_vec());
        router.register(worker.clone(), endpoints(&["a"]));
        router.unregister(&worker);
        assert!(!router.is_registered(&worker));
    }

    #[tokio::test]
    async fn test_fairness_across_two_workers() {
        let mut router = RequestRouter::new(Arc::new(InMemoryStore::new()));
        let w1 = WorkerId::from_bytes(b"w1".to_vec());
        let w2 = WorkerId::from_bytes(b"w2".to_vec());
        router.register(w1.clone(), endpoints(&["a"]));
        router.register(w2.clone(), endpoints(&["a", "b"]));

        let r_b = request("b");
        router.enqueue(r_b.clone()).await.expect("enqueue");
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let r_a = request("a");
        router.enqueue(r_a.clone()).await.expect("enqueue");

        let dispatched = router.dispatch().await.expect("dispatch");
        let by_worker: HashMap<_, _> = dispatched.into_iter().collect();
        assert_eq!(by_worker.get(&w2).map(|r| r.id), Some(r_b.id));
        assert_eq!(by_worker.get(&w1).map(|r| r.id), Some(r_a.id));
    }
}
