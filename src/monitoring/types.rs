//! Monitoring event types and configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::util::{RequestId, WorkerId};

/// Configuration for monitoring behavior.
///
/// Controls how events are recorded, filtered, and stored in the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    /// Whether monitoring is enabled
    pub enabled: bool,

    /// Maximum number of events to keep in history
    pub max_history_size: usize,

    /// Minimum severity level to record (events below this are filtered)
    pub severity_filter: EventSeverity,

    /// Interval for snapshot generation (if using background snapshots)
    #[serde(with = "crate::util::duration_serde")]
    pub snapshot_interval: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
            snapshot_interval: Duration::from_secs(60),
        }
    }
}

/// Snapshot of monitoring state at a point in time.
///
/// Provides queryable access to monitoring counters and recent event history.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    /// Timestamp when snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Total number of events recorded
    pub total_events: u64,

    /// Number of trace-level events
    pub trace_count: u64,

    /// Number of debug-level events
    pub debug_count: u64,

    /// Number of info-level events
    pub info_count: u64,

    /// Number of warning-level events
    pub warning_count: u64,

    /// Number of error-level events
    pub error_count: u64,

    /// Number of critical-level events
    pub critical_count: u64,

    /// Recent events (up to max_history_size)
    pub recent_events: Vec<E>,
}

// ============================================================================
// Broker events
// ============================================================================

/// Events emitted by `BrokerLoop` (§4.7).
#[derive(Debug, Clone, Serialize)]
pub struct BrokerEvent {
    pub timestamp: DateTime<Utc>,
    pub event_kind: BrokerEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for BrokerEvent {
    const EVENT_TYPE: &'static str = "broker";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            BrokerEventKind::RequestEnqueued { .. } => EventSeverity::Trace,
            BrokerEventKind::RequestDispatched { .. } => EventSeverity::Trace,
            BrokerEventKind::RequestForwarded { .. } => EventSeverity::Trace,
            BrokerEventKind::WorkerRegistered { .. } => EventSeverity::Info,
            BrokerEventKind::WorkerUnregistered { .. } => EventSeverity::Info,
            BrokerEventKind::PingSent { .. } => EventSeverity::Debug,
            BrokerEventKind::KickSent { .. } => EventSeverity::Warning,
            BrokerEventKind::SignatureVerificationFailed { .. } => EventSeverity::Error,
            BrokerEventKind::UnknownResponseId { .. } => EventSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum BrokerEventKind {
    /// A client frame was parsed and queued.
    RequestEnqueued { request_id: RequestId, endpoint: String },

    /// A request was handed to a ready worker.
    RequestDispatched { request_id: RequestId, worker_id: WorkerId },

    /// A worker response was forwarded back to the originating client.
    RequestForwarded { request_id: RequestId },

    /// A worker sent its handshake (`endpoints` present).
    WorkerRegistered { worker_id: WorkerId },

    /// A worker disconnected or was kicked.
    WorkerUnregistered { worker_id: WorkerId },

    /// A liveness probe was sent to a silent worker.
    PingSent { worker_id: WorkerId },

    /// A worker was kicked, either for probe timeout or an unregistered ping.
    KickSent { worker_id: WorkerId },

    /// A worker-control or worker-response frame failed signature
    /// verification and was dropped.
    SignatureVerificationFailed { worker_id: String },

    /// A worker response named a request id with no matching durable
    /// record; the response was dropped instead of forwarded.
    UnknownResponseId { request_id: RequestId },
}

// ============================================================================
// Worker events
// ============================================================================

/// Events emitted by `WorkerLoop` (§4.8).
#[derive(Debug, Clone, Serialize)]
pub struct WorkerEvent {
    pub timestamp: DateTime<Utc>,
    pub event_kind: WorkerEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for WorkerEvent {
    const EVENT_TYPE: &'static str = "worker";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            WorkerEventKind::HandlerInvoked { .. } => EventSeverity::Trace,
            WorkerEventKind::HandlerError { .. } => EventSeverity::Error,
            WorkerEventKind::ReadyAgain => EventSeverity::Trace,
            WorkerEventKind::HandshakeSent => EventSeverity::Info,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum WorkerEventKind {
    /// A handler ran to completion (successfully or with a `RequestError`).
    HandlerInvoked {
        request_id: RequestId,
        method: String,
        endpoint: String,
        status: u16,
    },

    /// A handler panicked or returned an error the worker could not map to a
    /// `RequestError`; the loop logged it and returned status 500.
    HandlerError { request_id: RequestId, error: String },

    /// The worker reported `{w: true}` after finishing a request.
    ReadyAgain,

    /// The initial or re-sent `{endpoints, w: true}` handshake went out.
    HandshakeSent,
}

// ============================================================================
// Liveness events
// ============================================================================

/// Events emitted by `LivenessMonitor` transitions, as observed by the loop
/// that owns it (§4.6).
#[derive(Debug, Clone, Serialize)]
pub struct LivenessEvent {
    pub timestamp: DateTime<Utc>,
    pub peer: String,
    pub event_kind: LivenessEventKind,
}

impl MonitoringEvent for LivenessEvent {
    const EVENT_TYPE: &'static str = "liveness";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match self.event_kind {
            LivenessEventKind::Contact => EventSeverity::Trace,
            LivenessEventKind::ProbeDue => EventSeverity::Debug,
            LivenessEventKind::DisconnectDue => EventSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum LivenessEventKind {
    Contact,
    ProbeDue,
    DisconnectDue,
}

// ============================================================================
// Queue events
// ============================================================================

/// Events emitted by `EndpointQueue`/`QueueSet` mutations (§4.3/4.4).
#[derive(Debug, Clone, Serialize)]
pub struct QueueEvent {
    pub timestamp: DateTime<Utc>,
    pub request_id: RequestId,
    pub endpoint: String,
    pub event_kind: QueueEventKind,
}

impl MonitoringEvent for QueueEvent {
    const EVENT_TYPE: &'static str = "queue";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        EventSeverity::Trace
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum QueueEventKind {
    Appended,
    Popped,
    Removed,
}
