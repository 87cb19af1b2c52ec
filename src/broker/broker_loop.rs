//! `BrokerLoop` — the single cooperative event loop driving client dispatch,
//! worker control, and heartbeats (§4.7).

use std::collections::HashMap;
use std::sync::Arc;

use rmpv::Value;
use tracing::{debug, warn};

use super::config::BrokerConfig;
use super::error::BrokerError;
use crate::crypto::{signed, KeyStore};
use crate::liveness::LivenessMonitor;
use crate::monitoring::{BrokerEvent, BrokerEventKind, Monitor};
use crate::queue::{ClientRequest, QueueError};
use crate::router::{RequestRouter, RouterError};
use crate::store::DurableStore;
use crate::transport::RoutedSocket;
use crate::util::{RequestId, WorkerId};
use crate::wire::codec::{bytes_map, str_map};
use crate::wire::{Frame, WireError};

const ACK_OK: &[u8] = b"OK";

/// Binds the three broker-facing sockets (client, worker-control,
/// worker-response) and drives them through the fixed per-iteration
/// algorithm of §4.7. `C`, `W`, `R` may all be the same concrete socket type
/// or three distinct ones (e.g. three bound in-memory routers, or three TCP
/// listeners).
pub struct BrokerLoop<C, W, R, S, M> {
    client_socket: C,
    worker_control_socket: W,
    worker_response_socket: R,
    router: RequestRouter<S>,
    liveness: LivenessMonitor<WorkerId>,
    keystore: KeyStore,
    monitor: M,
    config: BrokerConfig,
}

impl<C, W, R, S, M> BrokerLoop<C, W, R, S, M>
where
    C: RoutedSocket,
    W: RoutedSocket,
    R: RoutedSocket,
    S: DurableStore,
    M: Monitor<BrokerEvent>,
{
    pub fn new(
        client_socket: C,
        worker_control_socket: W,
        worker_response_socket: R,
        store: Arc<S>,
        keystore: KeyStore,
        monitor: M,
        config: BrokerConfig,
    ) -> Self {
        Self {
            client_socket,
            worker_control_socket,
            worker_response_socket,
            router: RequestRouter::new(store),
            liveness: LivenessMonitor::new(config.t_probe, config.t_disconnect),
            keystore,
            monitor,
            config,
        }
    }

    /// Runs forever. Callers wanting graceful shutdown should wrap this in a
    /// `tokio::select!` against a cancellation signal at the outermost layer.
    pub async fn run(&mut self) -> Result<(), BrokerError> {
        loop {
            self.step().await?;
        }
    }

    /// One iteration of the loop: drains each socket once (client,
    /// worker-control, worker-response, in that order), then runs dispatch
    /// and heartbeat unconditionally. Sleeps for the poll timeout only when
    /// no socket had anything readable, so heartbeat ticks are never
    /// starved by a busy client socket.
    pub async fn step(&mut self) -> Result<(), BrokerError> {
        let mut did_work = false;
        did_work |= self.handle_client().await?;
        did_work |= self.handle_worker_control().await?;
        did_work |= self.handle_worker_response().await?;

        self.run_dispatch().await?;
        self.run_probes().await?;
        self.run_disconnects().await?;

        if !did_work {
            tokio::time::sleep(self.config.poll_timeout()).await;
        }
        Ok(())
    }

    async fn record(&self, event_kind: BrokerEventKind) {
        let event = BrokerEvent {
            timestamp: chrono::Utc::now(),
            event_kind,
            metadata: HashMap::new(),
        };
        if let Err(err) = self.monitor.record(event).await {
            warn!(?err, "failed to record broker event");
        }
    }

    /// Step 1: parse one client envelope, mint an id, enqueue.
    async fn handle_client(&mut self) -> Result<bool, BrokerError> {
        let Some(envelope) = self.client_socket.try_recv().await? else {
            return Ok(false);
        };

        let frame = Frame::decode(&envelope.payload)?;
        let method = frame
            .get_str("method")
            .ok_or(WireError::MissingField("method"))?
            .to_string();
        let endpoint = frame
            .get_str("endpoint")
            .ok_or(WireError::MissingField("endpoint"))?
            .to_string();
        let parameters = frame.get_str_map("parameters").unwrap_or_default();
        let data = frame.get_bytes_map("data").unwrap_or_default();

        let id = RequestId::new();
        let request = ClientRequest::new(id, envelope.source, method, endpoint.clone(), parameters, data);
        self.router.enqueue(request).await?;
        self.record(BrokerEventKind::RequestEnqueued { request_id: id, endpoint }).await;
        Ok(true)
    }

    /// Step 2: verify, decode, record contact, then inspect the payload in
    /// the fixed case order `endpoints` -> `ping` -> `pong` -> `disconnect`
    /// -> `r` -> `w`.
    async fn handle_worker_control(&mut self) -> Result<bool, BrokerError> {
        let Some(envelope) = self.worker_control_socket.try_recv().await? else {
            return Ok(false);
        };
        let worker_id = WorkerId::from_bytes(envelope.source.first().cloned().unwrap_or_default());

        let inner = match signed::unwrap(&self.keystore, &worker_id.identity_str(), &envelope.payload) {
            Ok(inner) => inner,
            Err(err) => {
                warn!(%worker_id, %err, "dropping worker-control frame: signature verification failed");
                self.record(BrokerEventKind::SignatureVerificationFailed {
                    worker_id: worker_id.identity_str(),
                })
                .await;
                return Ok(true);
            }
        };
        let frame = Frame::decode(&inner)?;

        self.liveness.contact_from(worker_id.clone());

        if let Some(endpoints) = frame.get_str_set("endpoints") {
            self.router.register(worker_id.clone(), endpoints);
            self.record(BrokerEventKind::WorkerRegistered { worker_id: worker_id.clone() }).await;
        } else if frame.get_bool("ping").unwrap_or(false) {
            if self.router.is_registered(&worker_id) {
                self.send_control(&worker_id, "pong").await?;
            } else {
                self.send_control(&worker_id, "kick").await?;
                self.liveness.disconnect(&worker_id);
                self.record(BrokerEventKind::KickSent { worker_id: worker_id.clone() }).await;
            }
        } else if frame.get_bool("pong").unwrap_or(false) {
            // contact already recorded above; nothing else to do.
        } else if frame.get_bool("disconnect").unwrap_or(false) {
            self.router.unregister(&worker_id);
            self.liveness.disconnect(&worker_id);
            self.record(BrokerEventKind::WorkerUnregistered { worker_id: worker_id.clone() }).await;
        } else if frame.contains("r") {
            // acknowledgement of task receipt; no action required.
        } else if frame.get_bool("w").unwrap_or(false) {
            self.router.mark_ready(worker_id);
        }

        Ok(true)
    }

    /// Step 3: verify, decode, ack, forward the response to the client.
    async fn handle_worker_response(&mut self) -> Result<bool, BrokerError> {
        let Some(envelope) = self.worker_response_socket.try_recv().await? else {
            return Ok(false);
        };
        let worker_id = WorkerId::from_bytes(envelope.source.first().cloned().unwrap_or_default());

        let inner = match signed::unwrap(&self.keystore, &worker_id.identity_str(), &envelope.payload) {
            Ok(inner) => inner,
            Err(err) => {
                warn!(%worker_id, %err, "dropping worker-response frame: signature verification failed");
                self.record(BrokerEventKind::SignatureVerificationFailed {
                    worker_id: worker_id.identity_str(),
                })
                .await;
                return Ok(true);
            }
        };
        let frame = Frame::decode(&inner)?;

        self.worker_response_socket
            .send_to(&envelope.source, ACK_OK.to_vec())
            .await?;

        let id_str = frame.get_str("id").ok_or(WireError::MissingField("id"))?;
        let id = RequestId::parse(id_str).ok_or(WireError::WrongFieldType("id"))?;

        let client_request = match self.router.retrieve(&id).await {
            Ok(request) => request,
            Err(RouterError::Queue(QueueError::NotFound(_))) => {
                let err = BrokerError::UnknownRequest(id);
                warn!(%err, "dropping worker response: no durable record for this request id");
                self.record(BrokerEventKind::UnknownResponseId { request_id: id }).await;
                return Ok(true);
            }
            Err(err) => return Err(err.into()),
        };
        self.router.remove(&id).await?;

        let status = frame.get_u64("status").ok_or(WireError::MissingField("status"))?;
        let response = frame.get("response").cloned().unwrap_or(Value::Nil);
        let forward = Frame::map([("status", Value::from(status)), ("response", response)]).encode()?;

        self.client_socket.send_to(&client_request.source, forward).await?;
        self.record(BrokerEventKind::RequestForwarded { request_id: id }).await;
        Ok(true)
    }

    /// Step 4: hand each dispatched request to its worker.
    async fn run_dispatch(&mut self) -> Result<(), BrokerError> {
        let dispatched = self.router.dispatch().await?;
        for (worker_id, request) in dispatched {
            let payload = Frame::map([
                ("id", Value::String(request.id.to_string().into())),
                ("method", Value::String(request.method.clone().into())),
                ("endpoint", Value::String(request.endpoint.clone().into())),
                ("parameters", str_map(&request.parameters)),
                ("data", bytes_map(&request.data)),
            ])
            .encode()?;
            let wrapped = signed::wrap(&self.keystore, payload)?;
            self.worker_control_socket
                .send_to(&[worker_id.as_bytes().to_vec()], wrapped)
                .await?;
            self.record(BrokerEventKind::RequestDispatched {
                request_id: request.id,
                worker_id,
            })
            .await;
        }
        Ok(())
    }

    /// Step 5: ping every peer that has gone quiet for longer than `T_probe`.
    async fn run_probes(&mut self) -> Result<(), BrokerError> {
        let due = self.liveness.due_for_probe(chrono::Utc::now());
        for worker_id in due {
            self.send_control(&worker_id, "ping").await?;
            self.record(BrokerEventKind::PingSent { worker_id }).await;
        }
        Ok(())
    }

    /// Step 6: kick and unregister every peer that never answered its probe.
    async fn run_disconnects(&mut self) -> Result<(), BrokerError> {
        let due = self.liveness.due_for_disconnect(chrono::Utc::now());
        for worker_id in due {
            self.send_control(&worker_id, "kick").await?;
            self.router.unregister(&worker_id);
            self.record(BrokerEventKind::KickSent { worker_id: worker_id.clone() }).await;
            self.record(BrokerEventKind::WorkerUnregistered { worker_id }).await;
        }
        Ok(())
    }

    async fn send_control(&mut self, worker_id: &WorkerId, control: &'static str) -> Result<(), BrokerError> {
        let payload = Frame::map([("control", Value::String(control.into()))]).encode()?;
        let wrapped = signed::wrap(&self.keystore, payload)?;
        self.worker_control_socket
            .send_to(&[worker_id.as_bytes().to_vec()], wrapped)
            .await?;
        debug!(%worker_id, control, "sent control frame");
        Ok(())
    }
}
