//! # fleetvisor
//!
//! **Fleetvisor** is a process lifecycle bridge for hosted game servers.
//!
//! A fleet orchestrator places sessions on long-running server processes it
//! manages. This crate handles the process side of that contract: it
//! registers the process, answers liveness probes within a deadline, relays
//! the orchestrator's session lifecycle notifications to application code as
//! typed events, and guarantees an orderly, idempotent shutdown handshake.
//! The orchestrator itself (placement, matchmaking backfill, fleet scaling,
//! wire protocol) stays behind the [`OrchestratorClient`] seam.
//!
//! ## Architecture
//! ```text
//!  orchestrator worker threads              application main loop
//! ┌──────────────────────────────┐      ┌─────────────────────────────┐
//! │ OrchestratorClient callbacks │      │  bridge.sink().drain()      │
//! │  start / update / terminate  │      │  once per tick              │
//! │  health probe                │      └───────────▲─────────────────┘
//! └──────────────┬───────────────┘                  │
//!                ▼                                  │
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  LifecycleBridge                                                  │
//! │  - state machine (uninitialized → … → terminated)                 │
//! │  - owned orchestrator handle (taken at build, released at end)    │
//! │  - health probe with soft deadline                                │
//! │  - single-writer, idempotent termination handshake                │
//! └──────────────┬────────────────────────────────────────────────────┘
//!                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventSink (bounded FIFO queue + typed channels)                  │
//! │   session-started │ session-updated │ process-terminating │ health│
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! initialize()           ──► connect + ready handshake          ──► Ready
//! start-session callback ──► notify_activated(), SessionStarted ──► Activated
//! update callback        ──► reason validated, SessionUpdated   ──► Activated
//! terminate callback     ─┐
//! OS signal              ─┼─► notify_ending(), handle released,
//! shutdown()             ─┘   ProcessTerminating                ──► Terminated
//! ```
//!
//! Whichever termination trigger fires first performs the handshake; every
//! other one observes the terminal state and no-ops. Events are queued off
//! the callback threads and drained in FIFO order from the application's
//! tick, so handlers always run on the main-loop thread and observe the
//! orchestrator's causal order.
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits                      |
//! |-----------------|----------------------------------------------------------|-----------------------------------------|
//! | **Lifecycle**   | Registration, activation, idempotent shutdown handshake. | [`LifecycleBridge`], [`LifecycleState`]  |
//! | **Events**      | Typed channels with isolated, tick-driven dispatch.      | [`EventSink`]                            |
//! | **Health**      | Predicate under a soft deadline, fail-open default.      | [`BridgeBuilder::with_health_check`]     |
//! | **Client seam** | Contract the vendor SDK wrapper implements.              | [`OrchestratorClient`], [`ClientRef`]    |
//! | **Config**      | Validated process identity plus runtime tuning.          | [`ProcessConfig`], [`BridgeConfig`]      |
//! | **Errors**      | Typed errors with fatality and exit-code mapping.        | [`BridgeError`], [`ConfigError`]         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use fleetvisor::{
//!     LifecycleBridge, OrchestratorClient, OrchestratorError, ProcessConfig,
//! };
//!
//! // Production code wraps the vendor server SDK behind this seam.
//! struct VendorClient;
//!
//! #[async_trait]
//! impl OrchestratorClient for VendorClient {
//!     async fn initialize(&self, _config: &ProcessConfig) -> Result<(), OrchestratorError> {
//!         Ok(())
//!     }
//!     async fn notify_ready(&self, _config: &ProcessConfig) -> Result<(), OrchestratorError> {
//!         Ok(())
//!     }
//!     async fn notify_activated(&self) -> Result<(), OrchestratorError> {
//!         Ok(())
//!     }
//!     async fn notify_ending(&self) -> Result<(), OrchestratorError> {
//!         Ok(())
//!     }
//!     async fn shutdown(&self) {}
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> std::process::ExitCode {
//!     let config = match ProcessConfig::from_env() {
//!         Ok(config) => config,
//!         Err(err) => {
//!             eprintln!("invalid configuration: {err}");
//!             return std::process::ExitCode::from(2);
//!         }
//!     };
//!
//!     let bridge = LifecycleBridge::builder(config, Arc::new(VendorClient))
//!         .with_health_check(|| true)
//!         .build()
//!         .expect("configuration was already validated");
//!
//!     // Subscribe before initialize() so no event can be missed.
//!     bridge.sink().on_session_started(|session| {
//!         println!("session placed: {session}");
//!     });
//!     bridge.sink().on_process_terminating(|| {
//!         println!("winding down");
//!     });
//!
//!     if let Err(err) = bridge.initialize().await {
//!         eprintln!("fatal: {err}");
//!         return std::process::ExitCode::from(err.exit_code());
//!     }
//!
//!     // Stand-in for the game loop: drain queued events once per tick.
//!     let ticker = {
//!         let bridge = Arc::clone(&bridge);
//!         tokio::spawn(async move {
//!             let stop = bridge.termination_token();
//!             loop {
//!                 tokio::select! {
//!                     _ = stop.cancelled() => break,
//!                     _ = tokio::time::sleep(Duration::from_millis(16)) => {
//!                         bridge.sink().drain();
//!                     }
//!                 }
//!             }
//!         })
//!     };
//!
//!     let outcome = bridge.run_until_signal().await;
//!     let _ = ticker.await;
//!     match outcome {
//!         Ok(()) => std::process::ExitCode::SUCCESS,
//!         Err(err) => {
//!             eprintln!("shutdown: {err}");
//!             std::process::ExitCode::from(err.exit_code())
//!         }
//!     }
//! }
//! ```

mod bridge;
mod config;
mod error;
mod events;
mod orchestrator;
mod session;
mod sink;

// ---- Public re-exports ----

pub use bridge::{BridgeBuilder, HealthPredicate, LifecycleBridge, LifecycleState};
pub use config::{BridgeConfig, ProcessConfig, DEFAULT_LISTENING_PORT};
pub use error::{BridgeError, ConfigError, OrchestratorError};
pub use orchestrator::{ClientRef, OrchestratorClient};
pub use session::{SessionDescriptor, SessionUpdate, UpdateReason};
pub use sink::EventSink;

// Optional: expose a simple built-in stdout event logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use sink::LogWriter;
