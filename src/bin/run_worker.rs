//! Thin convenience binary wiring a `WorkerLoop` to TCP sockets, configured
//! from environment variables (§6 configuration variables; §4.8).
//!
//! ```text
//! NIMBUS_CONTROL_ADDR=127.0.0.1:5556 \
//! NIMBUS_RESPONSE_ADDR=127.0.0.1:5557 \
//! cargo run --bin run_worker
//! ```
//!
//! Ships with a single `GET /health` route so the binary is runnable
//! out of the box; real deployments replace `build_registry` with their
//! own `HandlerRegistry`.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rmpv::Value;

use nimbus::monitoring::InMemoryMonitor;
use nimbus::transport::TcpDealerSocket;
use nimbus::{
    Handler, HandlerRegistry, HandlerResponse, KeyStore, MonitoringConfig, RequestError, WorkerConfig,
    WorkerLoop, WorkerRequest,
};

struct HealthHandler;

#[async_trait]
impl Handler for HealthHandler {
    async fn call(&self, _request: &WorkerRequest) -> Result<HandlerResponse, Box<dyn RequestError>> {
        Ok(HandlerResponse::ok(Value::from("ok")))
    }
}

fn build_registry() -> HandlerRegistry {
    HandlerRegistry::builder().route("GET", "health", HealthHandler).build()
}

fn env_duration(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn load_keystore() -> KeyStore {
    match (env::var("NIMBUS_SIGNING_KEY"), env::var("NIMBUS_PEER_KEY_DIR")) {
        (Ok(key_path), Ok(peer_dir)) => match KeyStore::load(&key_path, &peer_dir) {
            Ok(keystore) => keystore,
            Err(err) => {
                tracing::warn!(%err, "failed to load signing key, falling back to unsigned mode");
                KeyStore::unsigned()
            }
        },
        _ => KeyStore::unsigned(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let control_addr = env::var("NIMBUS_CONTROL_ADDR").unwrap_or_else(|_| "127.0.0.1:5556".to_string());
    let response_addr = env::var("NIMBUS_RESPONSE_ADDR").unwrap_or_else(|_| "127.0.0.1:5557".to_string());

    let config = WorkerConfig::builder()
        .control_addr(control_addr.clone())
        .response_addr(response_addr.clone())
        .t_probe(env_duration("NIMBUS_T_PROBE_SECONDS", Duration::from_secs(30)))
        .t_disconnect(env_duration("NIMBUS_T_DISCONNECT_SECONDS", Duration::from_secs(30)))
        .build()
        .map_err(|err| format!("invalid worker config: {err}"))?;

    tracing::info!(%control_addr, %response_addr, "starting worker");

    let control_socket = TcpDealerSocket::connect(&control_addr).await?;
    let response_socket = TcpDealerSocket::connect(&response_addr).await?;

    let registry = Arc::new(build_registry());
    let keystore = load_keystore();
    let monitor = InMemoryMonitor::new(MonitoringConfig::default());

    let mut worker = WorkerLoop::new(control_socket, response_socket, registry, keystore, monitor, config);

    worker.run().await?;
    Ok(())
}
