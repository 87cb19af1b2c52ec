//! Thin convenience binary wiring a `BrokerLoop` to TCP sockets and a
//! filesystem-backed store, configured entirely from environment variables
//! (§6 configuration variables; §4.7).
//!
//! ```text
//! NIMBUS_CLIENT_ADDR=0.0.0.0:5555 \
//! NIMBUS_WORKER_CONTROL_ADDR=0.0.0.0:5556 \
//! NIMBUS_WORKER_RESPONSE_ADDR=0.0.0.0:5557 \
//! cargo run --bin run_broker
//! ```
//!
//! Signing is optional: set `NIMBUS_SIGNING_KEY` and `NIMBUS_PEER_KEY_DIR`
//! to require signed worker frames, or leave both unset to run unsigned.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use nimbus::monitoring::InMemoryMonitor;
use nimbus::transport::TcpRouterSocket;
use nimbus::{BrokerConfig, BrokerLoop, InMemoryStore, KeyStore, MonitoringConfig};

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

    let client_addr = env::var("NIMBUS_CLIENT_ADDR").unwrap_or_else(|_| "0.0.0.0:5555".to_string());
    let worker_control_addr = env::var("NIMBUS_WORKER_CONTROL_ADDR").unwrap_or_else(|_| "0.0.0.0:5556".to_string());
    let worker_response_addr = env::var("NIMBUS_WORKER_RESPONSE_ADDR").unwrap_or_else(|_| "0.0.0.0:5557".to_string());

    let config = BrokerConfig::builder()
        .client_addr(client_addr.clone())
        .worker_control_addr(worker_control_addr.clone())
        .worker_response_addr(worker_response_addr.clone())
        .t_probe(env_duration("NIMBUS_T_PROBE_SECONDS", Duration::from_secs(30)))
        .t_disconnect(env_duration("NIMBUS_T_DISCONNECT_SECONDS", Duration::from_secs(30)))
        .build()
        .map_err(|err| format!("invalid broker config: {err}"))?;

    tracing::info!(%client_addr, %worker_control_addr, %worker_response_addr, "starting broker");

    let client_socket = TcpRouterSocket::bind(&client_addr).await?;
    let worker_control_socket = TcpRouterSocket::bind(&worker_control_addr).await?;
    let worker_response_socket = TcpRouterSocket::bind(&worker_response_addr).await?;

    let store = Arc::new(InMemoryStore::new());
    let keystore = load_keystore();
    let monitor = InMemoryMonitor::new(MonitoringConfig::default());

    let mut broker = BrokerLoop::new(
        client_socket,
        worker_control_socket,
        worker_response_socket,
        store,
        keystore,
        monitor,
        config,
    );

    broker.run().await?;
    Ok(())
}
