//! Integration tests for the monitoring infrastructure.
//!
//! Tests the complete monitoring system including:
//! - Configuration and setup
//! - Multi-monitor coordination across Nimbus's four event types
//! - High-load scenarios
//! - Dynamic configuration changes
//! - Cross-event-type tracking

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use nimbus::monitoring::{
    BrokerEvent, BrokerEventKind, EventSeverity, InMemoryMonitor, LivenessEvent, LivenessEventKind,
    Monitor, MonitoringConfig, NoopMonitor, QueueEvent, QueueEventKind, WorkerEvent, WorkerEventKind,
};
use nimbus::util::{RequestId, WorkerId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use chrono::Utc;

fn trace_config(max_history_size: usize) -> MonitoringConfig {
    MonitoringConfig {
        enabled: true,
        max_history_size,
        severity_filter: EventSeverity::Trace,
        snapshot_interval: Duration::from_secs(60),
    }
}

// ============================================================================
// Integration Tests - Multi-Monitor Coordination
// ============================================================================

#[tokio::test]
async fn test_multiple_monitors_coordination() {
    let config = trace_config(100);

    let broker_monitor = InMemoryMonitor::<BrokerEvent>::new(config.clone());
    let worker_monitor = InMemoryMonitor::<WorkerEvent>::new(config.clone());
    let liveness_monitor = InMemoryMonitor::<LivenessEvent>::new(config.clone());

    let worker_id = WorkerId::from_bytes(b"w1".to_vec());

    broker_monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::WorkerRegistered { worker_id: worker_id.clone() },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    worker_monitor
        .record(WorkerEvent {
            timestamp: Utc::now(),
            event_kind: WorkerEventKind::HandshakeSent,
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    liveness_monitor
        .record(LivenessEvent {
            timestamp: Utc::now(),
            peer: worker_id.to_string(),
            event_kind: LivenessEventKind::Contact,
        })
        .await
        .unwrap();

    let broker_snapshot = broker_monitor.snapshot().await.unwrap();
    let worker_snapshot = worker_monitor.snapshot().await.unwrap();
    let liveness_snapshot = liveness_monitor.snapshot().await.unwrap();

    assert_eq!(broker_snapshot.total_events, 1);
    assert_eq!(worker_snapshot.total_events, 1);
    assert_eq!(liveness_snapshot.total_events, 1);

    assert_eq!(broker_snapshot.info_count, 1); // WorkerRegistered is Info
    assert_eq!(worker_snapshot.info_count, 1); // HandshakeSent is Info
    assert_eq!(liveness_snapshot.trace_count, 1); // Contact is Trace
}

#[tokio::test]
async fn test_request_lifecycle_tracking() {
    let monitor = InMemoryMonitor::<BrokerEvent>::new(trace_config(1000));
    let request_id = RequestId::new();
    let worker_id = WorkerId::from_bytes(b"w1".to_vec());

    let lifecycle = vec![
        BrokerEventKind::RequestEnqueued { request_id, endpoint: "a".to_string() },
        BrokerEventKind::RequestDispatched { request_id, worker_id: worker_id.clone() },
        BrokerEventKind::RequestForwarded { request_id },
    ];

    for event_kind in lifecycle {
        monitor
            .record(BrokerEvent {
                timestamp: Utc::now(),
                event_kind,
                metadata: HashMap::new(),
            })
            .await
            .unwrap();
    }

    let snapshot = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot.total_events, 3);
    assert_eq!(snapshot.trace_count, 3); // all three are Trace-level
    assert_eq!(snapshot.recent_events.len(), 3);
}

// ============================================================================
// High-Load Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_high_load_concurrent_recording() {
    let monitor = Arc::new(InMemoryMonitor::<QueueEvent>::new(trace_config(1000)));

    let mut handles = vec![];
    for i in 0..10 {
        let monitor_clone = Arc::clone(&monitor);
        let handle = tokio::spawn(async move {
            for j in 0..100 {
                let event = QueueEvent {
                    timestamp: Utc::now(),
                    request_id: RequestId::new(),
                    endpoint: format!("endpoint-{i}-{j}"),
                    event_kind: QueueEventKind::Appended,
                };
                monitor_clone.record(event).await.unwrap();
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap();
    }

    let snapshot = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot.total_events, 1000);
    assert_eq!(snapshot.recent_events.len(), 1000);
}

#[tokio::test]
async fn test_ring_buffer_eviction_under_load() {
    let monitor = InMemoryMonitor::<QueueEvent>::new(trace_config(50));

    for i in 0..100 {
        monitor
            .record(QueueEvent {
                timestamp: Utc::now(),
                request_id: RequestId::new(),
                endpoint: format!("endpoint-{i}"),
                event_kind: QueueEventKind::Appended,
            })
            .await
            .unwrap();
    }

    let snapshot = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot.total_events, 100);
    assert_eq!(snapshot.recent_events.len(), 50);

    let first = &snapshot.recent_events[0];
    assert!(first.endpoint.contains("endpoint-5"));
}

// ============================================================================
// Dynamic Configuration Tests
// ============================================================================

#[tokio::test]
async fn test_severity_filter_changes() {
    let config = MonitoringConfig {
        severity_filter: EventSeverity::Error,
        ..trace_config(100)
    };
    let monitor = InMemoryMonitor::<BrokerEvent>::new(config);

    // Debug-severity PingSent should be filtered.
    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::PingSent { worker_id: WorkerId::from_bytes(b"w1".to_vec()) },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    // Error-severity signature failure should pass the filter.
    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::SignatureVerificationFailed { worker_id: "w1".to_string() },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    let snapshot1 = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot1.total_events, 1);
    assert_eq!(snapshot1.error_count, 1);
    assert_eq!(snapshot1.debug_count, 0);

    // InMemoryMonitor's filter is fixed at construction; a looser filter
    // requires a new instance.
    let monitor = InMemoryMonitor::<BrokerEvent>::new(trace_config(100));
    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::PingSent { worker_id: WorkerId::from_bytes(b"w1".to_vec()) },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    let snapshot2 = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot2.total_events, 1);
    assert_eq!(snapshot2.debug_count, 1);
}

#[tokio::test]
async fn test_monitoring_enable_disable() {
    let mut config = trace_config(1000);
    config.enabled = false;

    let monitor = InMemoryMonitor::<BrokerEvent>::new(config);
    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::WorkerRegistered { worker_id: WorkerId::from_bytes(b"w1".to_vec()) },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    let snapshot1 = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot1.total_events, 0);

    let monitor = InMemoryMonitor::<BrokerEvent>::new(trace_config(100));
    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::WorkerRegistered { worker_id: WorkerId::from_bytes(b"w1".to_vec()) },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    let snapshot2 = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot2.total_events, 1);
}

// ============================================================================
// Event Type Coverage Tests
// ============================================================================

#[tokio::test]
async fn test_worker_handler_event_tracking() {
    let monitor = InMemoryMonitor::<WorkerEvent>::new(trace_config(1000));

    monitor
        .record(WorkerEvent {
            timestamp: Utc::now(),
            event_kind: WorkerEventKind::HandshakeSent,
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    monitor
        .record(WorkerEvent {
            timestamp: Utc::now(),
            event_kind: WorkerEventKind::HandlerInvoked {
                request_id: RequestId::new(),
                method: "GET".to_string(),
                endpoint: "a".to_string(),
                status: 200,
            },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    monitor
        .record(WorkerEvent {
            timestamp: Utc::now(),
            event_kind: WorkerEventKind::HandlerError {
                request_id: RequestId::new(),
                error: "no handler".to_string(),
            },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    monitor
        .record(WorkerEvent {
            timestamp: Utc::now(),
            event_kind: WorkerEventKind::ReadyAgain,
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    let snapshot = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot.total_events, 4);
    assert_eq!(snapshot.info_count, 1); // HandshakeSent
    assert_eq!(snapshot.error_count, 1); // HandlerError
    assert_eq!(snapshot.trace_count, 2); // HandlerInvoked + ReadyAgain
}

#[tokio::test]
async fn test_broker_dispatch_and_heartbeat_events() {
    let monitor = InMemoryMonitor::<BrokerEvent>::new(trace_config(1000));
    let worker_id = WorkerId::from_bytes(b"w1".to_vec());

    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::WorkerRegistered { worker_id: worker_id.clone() },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::PingSent { worker_id: worker_id.clone() },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::KickSent { worker_id: worker_id.clone() },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::SignatureVerificationFailed { worker_id: worker_id.to_string() },
            metadata: HashMap::new(),
        })
        .await
        .unwrap();

    let snapshot = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot.total_events, 4);
    assert_eq!(snapshot.info_count, 1); // WorkerRegistered
    assert_eq!(snapshot.debug_count, 1); // PingSent
    assert_eq!(snapshot.warning_count, 1); // KickSent
    assert_eq!(snapshot.error_count, 1); // SignatureVerificationFailed
}

#[tokio::test]
async fn test_liveness_event_tracking() {
    let monitor = InMemoryMonitor::<LivenessEvent>::new(trace_config(1000));

    for event_kind in [LivenessEventKind::Contact, LivenessEventKind::ProbeDue, LivenessEventKind::DisconnectDue] {
        monitor
            .record(LivenessEvent {
                timestamp: Utc::now(),
                peer: "w1".to_string(),
                event_kind,
            })
            .await
            .unwrap();
    }

    let snapshot = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot.total_events, 3);
    assert_eq!(snapshot.trace_count, 1); // Contact
    assert_eq!(snapshot.debug_count, 1); // ProbeDue
    assert_eq!(snapshot.warning_count, 1); // DisconnectDue
}

// ============================================================================
// NoopMonitor Integration Tests
// ============================================================================

#[tokio::test]
async fn test_noop_monitor_zero_overhead() {
    let noop = NoopMonitor::<QueueEvent>::new();

    for _ in 0..1000 {
        noop.record(QueueEvent {
            timestamp: Utc::now(),
            request_id: RequestId::new(),
            endpoint: "a".to_string(),
            event_kind: QueueEventKind::Appended,
        })
        .await
        .unwrap();
    }

    let snapshot = noop.snapshot().await.unwrap();
    assert_eq!(snapshot.total_events, 0);
    assert_eq!(snapshot.recent_events.len(), 0);

    noop.reset().await.unwrap();
}

// ============================================================================
// Metadata and Context Tests
// ============================================================================

#[tokio::test]
async fn test_event_metadata_tracking() {
    let monitor = InMemoryMonitor::<BrokerEvent>::new(trace_config(1000));

    let mut metadata = HashMap::new();
    metadata.insert("trace_id".to_string(), "trace-123".to_string());
    metadata.insert("client_addr".to_string(), "10.0.0.5".to_string());

    monitor
        .record(BrokerEvent {
            timestamp: Utc::now(),
            event_kind: BrokerEventKind::RequestEnqueued { request_id: RequestId::new(), endpoint: "a".to_string() },
            metadata: metadata.clone(),
        })
        .await
        .unwrap();

    let snapshot = monitor.snapshot().await.unwrap();
    assert_eq!(snapshot.recent_events.len(), 1);

    let event = &snapshot.recent_events[0];
    assert_eq!(event.metadata.get("trace_id").unwrap(), "trace-123");
    assert_eq!(event.metadata.get("client_addr").unwrap(), "10.0.0.5");
}

// ============================================================================
// Stress and Performance Tests
// ============================================================================

#[tokio::test]
async fn test_rapid_snapshot_generation() {
    let monitor = Arc::new(InMemoryMonitor::<QueueEvent>::new(trace_config(1000)));

    for i in 0..100 {
        monitor
            .record(QueueEvent {
                timestamp: Utc::now(),
                request_id: RequestId::new(),
                endpoint: format!("endpoint-{i}"),
                event_kind: QueueEventKind::Appended,
            })
            .await
            .unwrap();
    }

    let mut handles = vec![];
    for _ in 0..10 {
        let monitor_clone = Arc::clone(&monitor);
        let handle = tokio::spawn(async move {
            for _ in 0..10 {
                let snapshot = monitor_clone.snapshot().await.unwrap();
                assert!(snapshot.total_events >= 100);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_reset_during_concurrent_operations() {
    let monitor = Arc::new(InMemoryMonitor::<QueueEvent>::new(trace_config(1000)));

    let recorder = Arc::clone(&monitor);
    let record_handle = tokio::spawn(async move {
        for i in 0..1000 {
            recorder
                .record(QueueEvent {
                    timestamp: Utc::now(),
                    request_id: RequestId::new(),
                    endpoint: format!("endpoint-{i}"),
                    event_kind: QueueEventKind::Appended,
                })
                .await
                .unwrap();
            sleep(Duration::from_micros(100)).await;
        }
    });

    sleep(Duration::from_millis(50)).await;
    monitor.reset().await.unwrap();

    let snapshot = monitor.snapshot().await.unwrap();
    assert!(snapshot.total_events < 1000);

    record_handle.await.unwrap();
}
