//! `WorkerLoop` — handshake, heartbeat, and request/response cycle on the
//! worker side (§4.8).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rmpv::Value;
use tracing::warn;

use super::config::WorkerConfig;
use super::error::WorkerError;
use super::handler::{HandlerRegistry, WorkerRequest};
use crate::crypto::{signed, KeyStore};
use crate::liveness::LivenessMonitor;
use crate::monitoring::{Monitor, WorkerEvent, WorkerEventKind};
use crate::transport::PeerSocket;
use crate::util::RequestId;
use crate::wire::codec::str_list;
use crate::wire::Frame;

const BROKER_PEER: &str = "broker";
const ACK_POLL_ATTEMPTS: u32 = 50;
const ACK_POLL_INTERVAL_MS: u64 = 10;

/// Binds to the broker's control and response sockets. `C` and `R` are
/// typically two dealer-style connections to the same broker process.
pub struct WorkerLoop<C, R, M> {
    control_socket: C,
    response_socket: R,
    registry: Arc<HandlerRegistry>,
    liveness: LivenessMonitor<&'static str>,
    keystore: KeyStore,
    monitor: M,
    config: WorkerConfig,
    needs_handshake: bool,
}

impl<C, R, M> WorkerLoop<C, R, M>
where
    C: PeerSocket,
    R: PeerSocket,
    M: Monitor<WorkerEvent>,
{
    pub fn new(
        control_socket: C,
        response_socket: R,
        registry: Arc<HandlerRegistry>,
        keystore: KeyStore,
        monitor: M,
        config: WorkerConfig,
    ) -> Self {
        Self {
            control_socket,
            response_socket,
            registry,
            liveness: LivenessMonitor::new(config.t_probe, config.t_disconnect),
            keystore,
            monitor,
            config,
            needs_handshake: true,
        }
    }

    /// Sends the initial handshake, then loops forever, terminating only
    /// when the broker fails to answer a liveness probe in time.
    pub async fn run(&mut self) -> Result<(), WorkerError> {
        loop {
            self.step().await?;
        }
    }

    pub async fn step(&mut self) -> Result<(), WorkerError> {
        if self.needs_handshake {
            self.send_handshake().await?;
            self.needs_handshake = false;
        }

        let did_work = self.handle_control().await?;
        self.run_probes().await?;
        self.run_disconnect().await?;

        if !did_work {
            tokio::time::sleep(self.config.poll_timeout()).await;
        }
        Ok(())
    }

    async fn record(&self, event_kind: WorkerEventKind) {
        let event = WorkerEvent {
            timestamp: Utc::now(),
            event_kind,
            metadata: HashMap::new(),
        };
        if let Err(err) = self.monitor.record(event).await {
            warn!(?err, "failed to record worker event");
        }
    }

    async fn send_handshake(&mut self) -> Result<(), WorkerError> {
        let payload = Frame::map([
            ("endpoints", str_list(self.registry.endpoints().iter())),
            ("w", Value::Boolean(true)),
        ])
        .encode()?;
        let wrapped = signed::wrap(&self.keystore, payload)?;
        self.control_socket.send(wrapped).await?;
        // Seed our own clock for the synthetic "broker" peer: there is no
        // envelope source to learn contact from here, so the handshake send
        // itself starts the liveness window.
        self.liveness.contact_from(BROKER_PEER);
        self.record(WorkerEventKind::HandshakeSent).await;
        Ok(())
    }

    async fn handle_control(&mut self) -> Result<bool, WorkerError> {
        let Some(payload) = self.control_socket.try_recv().await? else {
            return Ok(false);
        };

        let inner = match signed::unwrap(&self.keystore, BROKER_PEER, &payload) {
            Ok(inner) => inner,
            Err(err) => {
                warn!(%err, "dropping control frame from broker: signature verification failed");
                return Ok(true);
            }
        };
        let frame = Frame::decode(&inner)?;
        self.liveness.contact_from(BROKER_PEER);

        if let Some(control) = frame.get_str("control") {
            match control {
                "ping" => self.send_control("pong").await?,
                "pong" => {}
                "kick" => self.needs_handshake = true,
                _ => {}
            }
        } else {
            self.handle_request(&frame).await?;
        }
        Ok(true)
    }

    async fn send_control(&mut self, control: &'static str) -> Result<(), WorkerError> {
        let payload = Frame::map([("control", Value::String(control.into()))]).encode()?;
        let wrapped = signed::wrap(&self.keystore, payload)?;
        self.control_socket.send(wrapped).await
    }

    async fn handle_request(&mut self, frame: &Frame) -> Result<(), WorkerError> {
        let id_str = frame.get_str("id").unwrap_or_default();
        let id = RequestId::parse(id_str).unwrap_or_default();
        let method = frame.get_str("method").unwrap_or_default().to_string();
        let endpoint = frame.get_str("endpoint").unwrap_or_default().to_string();
        let parameters = frame.get_str_map("parameters").unwrap_or_default();
        let data = frame.get_bytes_map("data").unwrap_or_default();

        let ack = Frame::map([("r", Value::String(id.to_string().into()))]).encode()?;
        let wrapped_ack = signed::wrap(&self.keystore, ack)?;
        self.control_socket.send(wrapped_ack).await?;

        let request = WorkerRequest {
            id,
            method: method.clone(),
            endpoint: endpoint.clone(),
            parameters,
            data,
        };

        let (response, status) = match self.registry.get(&method, &endpoint) {
            Some(handler) => match handler.call(&request).await {
                Ok(ok) => {
                    self.record(WorkerEventKind::HandlerInvoked {
                        request_id: id,
                        method,
                        endpoint,
                        status: ok.status,
                    })
                    .await;
                    (ok.response, ok.status)
                }
                Err(err) => {
                    let status = err.status_code();
                    self.record(WorkerEventKind::HandlerInvoked {
                        request_id: id,
                        method,
                        endpoint,
                        status,
                    })
                    .await;
                    (Value::Nil, status)
                }
            },
            None => {
                self.record(WorkerEventKind::HandlerError {
                    request_id: id,
                    error: format!("no handler registered for {method} {endpoint}"),
                })
                .await;
                (Value::Nil, 500)
            }
        };

        let response_frame = Frame::map([
            ("id", Value::String(id.to_string().into())),
            ("status", Value::from(u64::from(status))),
            ("response", response),
        ])
        .encode()?;
        let wrapped_response = signed::wrap(&self.keystore, response_frame)?;
        self.response_socket.send(wrapped_response).await?;

        let ready = Frame::map([("w", Value::Boolean(true))]).encode()?;
        let wrapped_ready = signed::wrap(&self.keystore, ready)?;
        self.control_socket.send(wrapped_ready).await?;
        self.record(WorkerEventKind::ReadyAgain).await;

        self.drain_response_ack().await?;
        Ok(())
    }

    /// Reads and discards the broker's one-byte acknowledgement on the
    /// response socket, polling briefly since `PeerSocket::try_recv` is
    /// non-blocking.
    async fn drain_response_ack(&mut self) -> Result<(), WorkerError> {
        for _ in 0..ACK_POLL_ATTEMPTS {
            if self.response_socket.try_recv().await?.is_some() {
                return Ok(());
            }
            tokio::time::sleep(std::time::Duration::from_millis(ACK_POLL_INTERVAL_MS)).await;
        }
        Ok(())
    }

    async fn run_probes(&mut self) -> Result<(), WorkerError> {
        let due = self.liveness.due_for_probe(Utc::now());
        if !due.is_empty() {
            let payload = Frame::map([("ping", Value::Boolean(true))]).encode()?;
            let wrapped = signed::wrap(&self.keystore, payload)?;
            self.control_socket.send(wrapped).await?;
        }
        Ok(())
    }

    async fn run_disconnect(&mut self) -> Result<(), WorkerError> {
        let due = self.liveness.due_for_disconnect(Utc::now());
        if !due.is_empty() {
            let payload = Frame::map([("disconnect", Value::Boolean(true))]).encode()?;
            let wrapped = signed::wrap(&self.keystore, payload)?;
            self.control_socket.send(wrapped).await?;
            return Err(WorkerError::BrokerDisconnected);
        }
        Ok(())
    }
}
