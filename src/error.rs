//! Error types used by the lifecycle bridge and the orchestrator seam.
//!
//! This module defines three error enums:
//!
//! - [`ConfigError`] — startup configuration validation failures.
//! - [`OrchestratorError`] — errors raised by an [`OrchestratorClient`](crate::OrchestratorClient)
//!   implementation while talking to the orchestrator.
//! - [`BridgeError`] — errors raised by the bridge itself while driving the
//!   process lifecycle.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging and
//! metrics. [`BridgeError`] additionally classifies fatality
//! ([`BridgeError::is_fatal`]) and maps each variant to a process exit code
//! ([`BridgeError::exit_code`]).

use thiserror::Error;

/// # Errors produced by startup configuration validation.
///
/// Raised once, when a [`ProcessConfig`](crate::ProcessConfig) is validated.
/// The process cannot register with the orchestrator until these are fixed,
/// so callers should treat any of them as fatal.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required string field is empty.
    #[error("required configuration field `{field}` is empty")]
    MissingField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The listening port is zero or could not be parsed.
    #[error("listening port must be a valid non-zero port number")]
    InvalidPort,

    /// A log path entry is empty.
    #[error("log path at index {index} is empty")]
    EmptyLogPath {
        /// Position of the offending entry in `log_paths`.
        index: usize,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fleetvisor::ConfigError;
    ///
    /// let err = ConfigError::InvalidPort;
    /// assert_eq!(err.as_label(), "config_invalid_port");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingField { .. } => "config_missing_field",
            ConfigError::InvalidPort => "config_invalid_port",
            ConfigError::EmptyLogPath { .. } => "config_empty_log_path",
        }
    }
}

/// # Errors produced by an orchestrator client implementation.
///
/// These cross the client seam: the bridge never inspects wire details, it
/// only wraps these into the matching [`BridgeError`] variant for the
/// lifecycle operation that failed.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The connection to the orchestrator could not be established or was lost.
    #[error("orchestrator connection failed: {detail}")]
    Connection {
        /// Transport-level failure description.
        detail: String,
    },

    /// The orchestrator rejected a notification.
    #[error("orchestrator rejected the request: {detail}")]
    Rejected {
        /// Rejection reason reported by the orchestrator.
        detail: String,
    },

    /// A notification did not complete within the client's own timeout.
    #[error("orchestrator request timed out after {timeout:?}")]
    Timeout {
        /// The client-side timeout that was exceeded.
        timeout: std::time::Duration,
    },
}

impl OrchestratorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            OrchestratorError::Connection { .. } => "orchestrator_connection",
            OrchestratorError::Rejected { .. } => "orchestrator_rejected",
            OrchestratorError::Timeout { .. } => "orchestrator_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            OrchestratorError::Connection { detail } => format!("connection: {detail}"),
            OrchestratorError::Rejected { detail } => format!("rejected: {detail}"),
            OrchestratorError::Timeout { timeout } => format!("timeout: {timeout:?}"),
        }
    }
}

/// # Errors produced by the lifecycle bridge.
///
/// Fatal variants mean the process cannot (or can no longer) host sessions
/// and must exit with the matching [`exit_code`](BridgeError::exit_code).
/// Recoverable variants are logged and dropped; the process keeps serving
/// the active session.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Connecting and registering with the orchestrator failed.
    ///
    /// Fatal: the bridge stays unregistered and the process must exit.
    #[error("orchestrator initialization failed: {detail}")]
    InitializationFailed {
        /// The underlying failure description.
        detail: String,
    },

    /// The orchestrator did not accept the ready notification.
    ///
    /// Fatal: the process was never advertised as able to host sessions.
    #[error("ready notification failed: {detail}")]
    ReadyNotificationFailed {
        /// The underlying failure description.
        detail: String,
    },

    /// The session activation notification was not accepted.
    ///
    /// Recoverable: the bridge stays ready and the orchestrator decides
    /// whether to re-place the session or terminate the process.
    #[error("activation notification failed: {detail}")]
    ActivationNotificationFailed {
        /// The underlying failure description.
        detail: String,
    },

    /// The ending notification failed during the shutdown handshake.
    ///
    /// The handshake still completes and resources are released; the caller
    /// logs the error and exits non-zero.
    #[error("ending notification failed: {detail}")]
    EndingNotificationFailed {
        /// The underlying failure description.
        detail: String,
    },

    /// A session update carried a reason code outside the recognized set.
    ///
    /// Recoverable: the single update is dropped, session state is unaffected.
    #[error("unrecognized session update reason `{code}`")]
    UnrecognizedUpdateReason {
        /// The raw wire code that failed to parse.
        code: String,
    },

    /// A lifecycle operation arrived in a state that does not accept it.
    ///
    /// Recoverable: the operation is dropped, state is unaffected.
    #[error("cannot {operation} while {from}")]
    InvalidTransition {
        /// Label of the state the bridge was in.
        from: &'static str,
        /// The operation that was rejected.
        operation: &'static str,
    },
}

impl BridgeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fleetvisor::BridgeError;
    ///
    /// let err = BridgeError::UnrecognizedUpdateReason { code: "REBALANCE".into() };
    /// assert_eq!(err.as_label(), "bridge_unrecognized_update_reason");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BridgeError::InitializationFailed { .. } => "bridge_initialization_failed",
            BridgeError::ReadyNotificationFailed { .. } => "bridge_ready_failed",
            BridgeError::ActivationNotificationFailed { .. } => "bridge_activation_failed",
            BridgeError::EndingNotificationFailed { .. } => "bridge_ending_failed",
            BridgeError::UnrecognizedUpdateReason { .. } => "bridge_unrecognized_update_reason",
            BridgeError::InvalidTransition { .. } => "bridge_invalid_transition",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BridgeError::InitializationFailed { detail } => format!("initialization: {detail}"),
            BridgeError::ReadyNotificationFailed { detail } => format!("ready: {detail}"),
            BridgeError::ActivationNotificationFailed { detail } => format!("activation: {detail}"),
            BridgeError::EndingNotificationFailed { detail } => format!("ending: {detail}"),
            BridgeError::UnrecognizedUpdateReason { code } => format!("unrecognized reason: {code}"),
            BridgeError::InvalidTransition { from, operation } => {
                format!("cannot {operation} while {from}")
            }
        }
    }

    /// Indicates whether the error must abort startup.
    ///
    /// Only the two registration-phase errors are fatal; everything after a
    /// successful ready handshake is recovered locally so the process keeps
    /// serving the active session whenever possible.
    ///
    /// # Example
    /// ```
    /// use fleetvisor::BridgeError;
    ///
    /// let fatal = BridgeError::InitializationFailed { detail: "refused".into() };
    /// assert!(fatal.is_fatal());
    ///
    /// let recoverable = BridgeError::UnrecognizedUpdateReason { code: "X".into() };
    /// assert!(!recoverable.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BridgeError::InitializationFailed { .. } | BridgeError::ReadyNotificationFailed { .. }
        )
    }

    /// Maps the error to a process exit code.
    ///
    /// A clean shutdown handshake exits 0; each failure that is expected to
    /// end the process gets a distinct code so fleet tooling can tell them
    /// apart:
    ///
    /// - `10` — [`BridgeError::InitializationFailed`]
    /// - `11` — [`BridgeError::ReadyNotificationFailed`]
    /// - `12` — [`BridgeError::EndingNotificationFailed`]
    /// - `1`  — any other variant (not expected to abort the process)
    pub fn exit_code(&self) -> u8 {
        match self {
            BridgeError::InitializationFailed { .. } => 10,
            BridgeError::ReadyNotificationFailed { .. } => 11,
            BridgeError::EndingNotificationFailed { .. } => 12,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(BridgeError::InitializationFailed { detail: "x".into() }.is_fatal());
        assert!(BridgeError::ReadyNotificationFailed { detail: "x".into() }.is_fatal());
        assert!(!BridgeError::EndingNotificationFailed { detail: "x".into() }.is_fatal());
        assert!(!BridgeError::ActivationNotificationFailed { detail: "x".into() }.is_fatal());
        assert!(!BridgeError::UnrecognizedUpdateReason { code: "x".into() }.is_fatal());
        assert!(!BridgeError::InvalidTransition {
            from: "terminated",
            operation: "session start"
        }
        .is_fatal());
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let init = BridgeError::InitializationFailed { detail: "x".into() }.exit_code();
        let ready = BridgeError::ReadyNotificationFailed { detail: "x".into() }.exit_code();
        let ending = BridgeError::EndingNotificationFailed { detail: "x".into() }.exit_code();
        assert_ne!(init, ready);
        assert_ne!(ready, ending);
        assert_ne!(init, ending);
        assert_ne!(init, 0);
        assert_ne!(ready, 0);
        assert_ne!(ending, 0);
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            ConfigError::MissingField { field: "fleet_id" }.as_label(),
            "config_missing_field"
        );
        assert_eq!(
            OrchestratorError::Rejected { detail: "no".into() }.as_label(),
            "orchestrator_rejected"
        );
        assert_eq!(
            BridgeError::EndingNotificationFailed { detail: "x".into() }.as_label(),
            "bridge_ending_failed"
        );
    }
}
