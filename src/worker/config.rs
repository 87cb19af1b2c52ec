//! Worker configuration: broker addresses and heartbeat timing (§4.8).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::broker::config::{DEFAULT_T_DISCONNECT, DEFAULT_T_PROBE};

/// Addresses the worker dials and the heartbeat timing it uses against its
/// own `LivenessMonitor` keyed by the synthetic peer `"broker"`.
///
/// # Examples
///
/// ```rust
/// use nimbus::worker::WorkerConfig;
///
/// let config = WorkerConfig::builder()
///     .control_addr("tcp://127.0.0.1:5556")
///     .response_addr("tcp://127.0.0.1:5557")
///     .build()
///     .unwrap();
/// assert_eq!(config.control_addr, "tcp://127.0.0.1:5556");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub control_addr: String,
    pub response_addr: String,

    #[serde(with = "crate::util::duration_serde")]
    pub t_probe: Duration,

    #[serde(with = "crate::util::duration_serde")]
    pub t_disconnect: Duration,
}

impl WorkerConfig {
    pub fn builder() -> WorkerConfigBuilder {
        WorkerConfigBuilder::default()
    }

    /// Matches `BrokerConfig::poll_timeout` exactly: the worker runs the same
    /// formula against its own timing (§4.8 "the same timeout formula").
    pub fn poll_timeout(&self) -> Duration {
        let floor = std::cmp::min(self.t_probe, self.t_disconnect) / 10;
        std::cmp::max(Duration::from_millis(500), floor)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.control_addr.is_empty() {
            return Err("control_addr must not be empty".to_string());
        }
        if self.response_addr.is_empty() {
            return Err("response_addr must not be empty".to_string());
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
pub struct WorkerConfigBuilder {
    control_addr: Option<String>,
    response_addr: Option<String>,
    t_probe: Option<Duration>,
    t_disconnect: Option<Duration>,
}

impl WorkerConfigBuilder {
    pub fn control_addr(mut self, addr: impl Into<String>) -> Self {
        self.control_addr = Some(addr.into());
        self
    }

    pub fn response_addr(mut self, addr: impl Into<String>) -> Self {
        self.response_addr = Some(addr.into());
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

    pub fn build(self) -> Result<WorkerConfig, String> {
        let config = WorkerConfig {
            control_addr: self.control_addr.ok_or("control_addr is required")?,
            response_addr: self.response_addr.ok_or("response_addr is required")?,
            t_probe: self.t_probe.unwrap_or(DEFAULT_T_PROBE),
            t_disconnect: self.t_disconnect.unwrap_or(DEFAULT_T_DISCONNECT),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_builder() -> WorkerConfigBuilder {
        WorkerConfig::builder().control_addr("control").response_addr("response")
    }

    #[test]
    fn test_builder_applies_defaults() {
        let config = full_builder().build().expect("build");
        assert_eq!(config.t_probe, DEFAULT_T_PROBE);
    }

    #[test]
    fn test_missing_address_fails_build() {
        let result = WorkerConfig::builder().control_addr("control").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_poll_timeout_matches_broker_formula() {
        let config = full_builder()
            .t_probe(Duration::from_secs(1))
            .t_disconnect(Duration::from_secs(1))
            .build()
            .expect("build");
        assert_eq!(config.poll_timeout(), Duration::from_millis(500));
    }
}
