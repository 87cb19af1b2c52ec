//! Broker configuration with sensible defaults (§2, §6).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default probe interval: `control.seconds_before_contact_check`.
pub const DEFAULT_T_PROBE: Duration = Duration::from_secs(30);

/// Default disconnect grace period: `control.seconds_before_disconnect`.
pub const DEFAULT_T_DISCONNECT: Duration = Duration::from_secs(30);

/// Bind addresses and heartbeat timing for one `BrokerLoop`.
///
/// Addresses are opaque strings interpreted by whichever `RoutedSocket`
/// implementation the loop is constructed with; store and key-material
/// configuration live on the constructor arguments passed to `BrokerLoop`
/// directly (§9 "Globals" — never as process-wide state).
///
/// # Examples
///
/// ```rust
/// use nimbus::broker::BrokerConfig;
/// use std::time::Duration;
///
/// let config = BrokerConfig::builder()
///     .client_addr("tcp://0.0.0.0:5555")
///     .worker_control_addr("tcp://0.0.0.0:5556")
///     .worker_response_addr("tcp://0.0.0.0:5557")
///     .t_probe(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// assert_eq!(config.t_probe, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    pub client_addr: String,
    pub worker_control_addr: String,
    pub worker_response_addr: String,

    #[serde(with = "crate::util::duration_serde")]
    pub t_probe: Duration,

    #[serde(with = "crate::util::duration_serde")]
    pub t_disconnect: Duration,
}

impl BrokerConfig {
    pub fn builder() -> BrokerConfigBuilder {
        BrokerConfigBuilder::default()
    }

    /// The poll timeout §4.7 mandates: `max(500ms, min(T_probe, T_disconnect) / 10)`.
    pub fn poll_timeout(&self) -> Duration {
        let floor = std::cmp::min(self.t_probe, self.t_disconnect) / 10;
        std::cmp::max(Duration::from_millis(500), floor)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.client_addr.is_empty() {
            return Err("client_addr must not be empty".to_string());
        }
        if self.worker_control_addr.is_empty() {
            return Err("worker_control_addr must not be empty".to_string());
        }
        if self.worker_response_addr.is_empty() {
            return Err("worker_response_addr must not be empty".to_string());
        }
        if self.t_probe.is_zero() {
            return Err("t_probe must be > 0".to_string());
        }
        if self.t_disconnect.is_zero() {
            return Err("t_disconnect must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct BrokerConfigBuilder {
    client_addr: Option<String>,
    worker_control_addr: Option<String>,
    worker_response_addr: Option<String>,
    t_probe: Option<Duration>,
    t_disconnect: Option<Duration>,
}

impl BrokerConfigBuilder {
    pub fn client_addr(mut self, addr: impl Into<String>) -> Self {
        self.client_addr = Some(addr.into());
        self
    }

    pub fn worker_control_addr(mut self, addr: impl Into<String>) -> Self {
        self.worker_control_addr = Some(addr.into());
        self
    }

    pub fn worker_response_addr(mut self, addr: impl Into<String>) -> Self {
        self.worker_response_addr = Some(addr.into());
        self
    }

    pub fn t_probe(mut self, duration: Duration) -> Self {
        self.t_probe = Some(duration);
        self
    }

    pub fn t_disconnect(mut self, duration: Duration) -> Self {
        self.t_disconnect = Some(duration);
        self
    }

    pub fn build(self) -> Result<BrokerConfig, String> {
        let config = BrokerConfig {
            client_addr: self.client_addr.ok_or("client_addr is required")?,
            worker_control_addr: self.worker_control_addr.ok_or("worker_control_addr is required")?,
            worker_response_addr: self.worker_response_addr.ok_or("worker_response_addr is required")?,
            t_probe: self.t_probe.unwrap_or(DEFAULT_T_PROBE),
            t_disconnect: self.t_disconnect.unwrap_or(DEFAULT_T_DISCONNECT),
        };
        config.validate()?;
        Ok(config)
    }
}
