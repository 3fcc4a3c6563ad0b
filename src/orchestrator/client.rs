//! # Client contract for the fleet orchestrator.
//!
//! [`OrchestratorClient`] covers the five calls the lifecycle handshake
//! needs: connect, the ready/activated/ending notifications, and release.
//! The wire protocol behind them is the implementation's business; the
//! bridge only sees `Result`s.
//!
//! Notifications are fire-and-wait: implementations apply their own request
//! timeout and report [`OrchestratorError::Timeout`] when it elapses. The
//! bridge adds no retry of its own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ProcessConfig;
use crate::error::OrchestratorError;

/// # Connection to the fleet orchestrator.
///
/// One instance represents one orchestrator connection. The bridge takes
/// exclusive ownership at build time, connects it during
/// [`initialize`](crate::LifecycleBridge::initialize), and releases it at the
/// end of the shutdown handshake; implementations should treat `shutdown` as
/// the final call on the handle.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use fleetvisor::{OrchestratorClient, OrchestratorError, ProcessConfig};
///
/// struct RecordingClient;
///
/// #[async_trait]
/// impl OrchestratorClient for RecordingClient {
///     async fn initialize(&self, _config: &ProcessConfig) -> Result<(), OrchestratorError> {
///         // open the connection to the orchestrator agent...
///         Ok(())
///     }
///
///     async fn notify_ready(&self, _config: &ProcessConfig) -> Result<(), OrchestratorError> {
///         Ok(())
///     }
///
///     async fn notify_activated(&self) -> Result<(), OrchestratorError> {
///         Ok(())
///     }
///
///     async fn notify_ending(&self) -> Result<(), OrchestratorError> {
///         Ok(())
///     }
///
///     async fn shutdown(&self) {}
/// }
/// ```
#[async_trait]
pub trait OrchestratorClient: Send + Sync + 'static {
    /// Establishes the connection and authenticates this process with the
    /// orchestrator, using the identity fields of `config`.
    async fn initialize(&self, config: &ProcessConfig) -> Result<(), OrchestratorError>;

    /// Advertises the process as ready to host sessions.
    ///
    /// Carries the listening port and the log paths the orchestrator should
    /// collect when a session ends.
    async fn notify_ready(&self, config: &ProcessConfig) -> Result<(), OrchestratorError>;

    /// Confirms that the placed session is accepting player connections.
    async fn notify_activated(&self) -> Result<(), OrchestratorError>;

    /// Tells the orchestrator this process is shutting down.
    async fn notify_ending(&self) -> Result<(), OrchestratorError>;

    /// Releases the connection. Called exactly once, after
    /// [`notify_ending`](OrchestratorClient::notify_ending), regardless of
    /// that call's outcome.
    async fn shutdown(&self);
}

/// Shared handle to an orchestrator client (`Arc<dyn OrchestratorClient>`).
pub type ClientRef = Arc<dyn OrchestratorClient>;
