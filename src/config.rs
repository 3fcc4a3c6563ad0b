//! # Process and bridge configuration.
//!
//! Two configuration layers:
//!
//! 1. **[`ProcessConfig`]**: identity and connection parameters the
//!    orchestrator needs to register this process. Supplied externally
//!    (environment or deployment tooling), validated once at startup, never
//!    mutated at runtime.
//! 2. **[`BridgeConfig`]**: runtime tuning for the bridge itself (health
//!    probe deadline, delivery queue capacity) with documented defaults.
//!
//! ## Environment variables
//! [`ProcessConfig::from_env`] reads:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `FLEETVISOR_PORT` | `listening_port` | `7777` |
//! | `FLEETVISOR_ENDPOINT` | `orchestrator_endpoint` | — (required) |
//! | `FLEETVISOR_PROCESS_ID` | `process_id` | — (required) |
//! | `FLEETVISOR_HOST_ID` | `host_id` | — (required) |
//! | `FLEETVISOR_FLEET_ID` | `fleet_id` | — (required) |
//! | `FLEETVISOR_AUTH_TOKEN` | `auth_token` | — (required) |
//! | `FLEETVISOR_LOG_PATHS` | `log_paths` (comma-separated) | empty |

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Default port the game server listens on for player connections.
pub const DEFAULT_LISTENING_PORT: u16 = 7777;

/// Identity and connection parameters for registering with the orchestrator.
///
/// All scalar string fields must be non-empty and the listening port must be
/// non-zero; [`validate`](ProcessConfig::validate) enforces this once before
/// the bridge is built. The struct is never mutated after construction.
///
/// `log_paths` is the ordered list of log files the orchestrator is told to
/// collect at the end of a session; the bridge registers the paths at ready
/// time but never writes or rotates them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessConfig {
    /// Port the game server accepts player connections on.
    pub listening_port: u16,
    /// Endpoint of the orchestrator agent this process registers with.
    pub orchestrator_endpoint: String,
    /// Unique identifier of this server process.
    pub process_id: String,
    /// Identifier of the host machine running this process.
    pub host_id: String,
    /// Identifier of the fleet this process belongs to.
    pub fleet_id: String,
    /// Authentication token presented to the orchestrator.
    pub auth_token: String,
    /// Ordered log file paths registered with the orchestrator at ready time.
    pub log_paths: Vec<String>,
}

impl ProcessConfig {
    /// Validates the startup invariants.
    ///
    /// - every scalar string field is non-empty,
    /// - `listening_port` is non-zero,
    /// - every `log_paths` entry is non-empty (the list itself may be empty).
    ///
    /// # Example
    /// ```
    /// use fleetvisor::{ConfigError, ProcessConfig};
    ///
    /// let mut config = ProcessConfig {
    ///     listening_port: 7777,
    ///     orchestrator_endpoint: "wss://orchestrator.example".into(),
    ///     process_id: "process-1".into(),
    ///     host_id: "host-1".into(),
    ///     fleet_id: "fleet-1".into(),
    ///     auth_token: "token".into(),
    ///     log_paths: vec!["/local/game/logs/server.log".into()],
    /// };
    /// assert!(config.validate().is_ok());
    ///
    /// config.fleet_id.clear();
    /// assert_eq!(
    ///     config.validate(),
    ///     Err(ConfigError::MissingField { field: "fleet_id" })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listening_port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let required: [(&'static str, &str); 5] = [
            ("orchestrator_endpoint", &self.orchestrator_endpoint),
            ("process_id", &self.process_id),
            ("host_id", &self.host_id),
            ("fleet_id", &self.fleet_id),
            ("auth_token", &self.auth_token),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ConfigError::MissingField { field });
            }
        }

        for (index, path) in self.log_paths.iter().enumerate() {
            if path.is_empty() {
                return Err(ConfigError::EmptyLogPath { index });
            }
        }
        Ok(())
    }

    /// Builds and validates a configuration from `FLEETVISOR_*` environment
    /// variables (see the module docs for the full table).
    ///
    /// A missing `FLEETVISOR_PORT` falls back to [`DEFAULT_LISTENING_PORT`];
    /// an unparseable one is [`ConfigError::InvalidPort`]. Missing required
    /// variables surface as [`ConfigError::MissingField`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let listening_port = match env::var("FLEETVISOR_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort)?,
            Err(_) => DEFAULT_LISTENING_PORT,
        };

        let log_paths = env::var("FLEETVISOR_LOG_PATHS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let config = Self {
            listening_port,
            orchestrator_endpoint: env_or_empty("FLEETVISOR_ENDPOINT"),
            process_id: env_or_empty("FLEETVISOR_PROCESS_ID"),
            host_id: env_or_empty("FLEETVISOR_HOST_ID"),
            fleet_id: env_or_empty("FLEETVISOR_FLEET_ID"),
            auth_token: env_or_empty("FLEETVISOR_AUTH_TOKEN"),
            log_paths,
        };
        config.validate()?;
        Ok(config)
    }
}

fn env_or_empty(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

/// Runtime tuning for the bridge.
///
/// Defines:
/// - **Health probe deadline**: local soft limit on the application's health
///   predicate. The orchestrator enforces its own hard timeout (documented as
///   60 seconds) after which it records the process as unhealthy; the local
///   deadline must stay well under it so a stuck predicate is reported as
///   `false` instead of tripping the external limit.
/// - **Delivery queue capacity**: bound on events queued between orchestrator
///   callbacks and the application's drain tick. On overflow the event is
///   dropped with a logged warning.
///
/// All fields are public; prefer [`queue_capacity_clamped`](BridgeConfig::queue_capacity_clamped)
/// over reading `queue_capacity` raw.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Soft deadline for one health probe. A predicate that has not returned
    /// by then is reported as unhealthy.
    pub health_deadline: Duration,

    /// Capacity of the event delivery queue (minimum 1, clamped).
    pub queue_capacity: usize,
}

impl BridgeConfig {
    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for BridgeConfig {
    /// Default configuration:
    ///
    /// - `health_deadline = 10s` (well under the orchestrator's 60s hard limit)
    /// - `queue_capacity = 1024` (good baseline for per-tick draining)
    fn default() -> Self {
        Self {
            health_deadline: Duration::from_secs(10),
            queue_capacity: 1024,
        }
    }
}
