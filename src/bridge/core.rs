//! # LifecycleBridge: owns the orchestrator handle and drives the lifecycle.
//!
//! The [`LifecycleBridge`] sits between an [`OrchestratorClient`] and the
//! application's [`EventSink`]. It enforces the state machine, translates
//! inbound callbacks into queued events, runs the health probe, and performs
//! the shutdown handshake exactly once.
//!
//! ## High-level architecture
//! ```text
//! Startup:
//!   ProcessConfig ──► LifecycleBridge::builder(config, client)
//!                        .with_health_check(...)        (optional)
//!                        .build()                       (validates config)
//!
//! Registration (initialize):
//!   client.initialize(&config) ──► client.notify_ready(&config) ──► Ready
//!
//! Callback flow (client worker threads):
//!   dispatch_start(session)   ──► notify_activated() ──► publish SessionStarted
//!   dispatch_update(session)  ──► parse reason       ──► publish SessionUpdated
//!   dispatch_terminate()      ──► termination handshake
//!   health_check()            ──► predicate under deadline ──► publish status
//!
//! Application (main-loop thread):
//!   bridge.sink().drain()  each tick ──► typed handlers, in order
//!
//! Shutdown path (any trigger, exactly once):
//!   Terminating ──► termination token cancelled
//!               ──► notify_ending() ──► client.shutdown()
//!               ──► publish ProcessTerminating ──► Terminated
//! ```
//!
//! ## Rules
//! - The state is owned here; dispatch operations that arrive in a state that
//!   does not accept them return [`BridgeError::InvalidTransition`] and change
//!   nothing.
//! - The termination handshake is single-writer: a concurrent application
//!   exit and an orchestrator-initiated termination race safely, the loser
//!   observes `Terminated` and no-ops with `Ok`.
//! - Event publication never blocks a callback thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use super::health::{HealthPredicate, HealthProbe};
use super::shutdown;
use super::state::LifecycleState;
use crate::config::{BridgeConfig, ProcessConfig};
use crate::error::{BridgeError, ConfigError};
use crate::events::Event;
use crate::orchestrator::ClientRef;
use crate::session::{SessionDescriptor, SessionUpdate, UpdateReason};
use crate::sink::EventSink;

/// Locks a mutex, ignoring poisoning (no user code ever runs under these
/// locks, so a poisoned guard still holds consistent data).
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for constructing a [`LifecycleBridge`].
pub struct BridgeBuilder {
    config: ProcessConfig,
    tuning: BridgeConfig,
    client: ClientRef,
    health: Option<HealthPredicate>,
}

impl BridgeBuilder {
    fn new(config: ProcessConfig, client: ClientRef) -> Self {
        Self {
            config,
            tuning: BridgeConfig::default(),
            client,
            health: None,
        }
    }

    /// Overrides the default runtime tuning (health deadline, queue capacity).
    pub fn with_tuning(mut self, tuning: BridgeConfig) -> Self {
        self.tuning = tuning;
        self
    }

    /// Registers the application's health predicate.
    ///
    /// Called once per orchestrator probe, on a blocking worker, under the
    /// configured soft deadline. Without one the bridge reports healthy.
    pub fn with_health_check(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.health = Some(Arc::new(predicate));
        self
    }

    /// Validates the configuration and builds the bridge.
    ///
    /// This is the single validation point: a bridge that exists always
    /// carries a valid, immutable [`ProcessConfig`].
    pub fn build(self) -> Result<Arc<LifecycleBridge>, ConfigError> {
        self.config.validate()?;
        let sink = Arc::new(EventSink::new(self.tuning.queue_capacity_clamped()));
        let probe = HealthProbe::new(self.health, self.tuning.health_deadline);

        Ok(Arc::new(LifecycleBridge {
            config: self.config,
            client: Mutex::new(Some(self.client)),
            state: Mutex::new(LifecycleState::Uninitialized),
            sink,
            probe,
            gate: tokio::sync::Mutex::new(()),
            termination: CancellationToken::new(),
        }))
    }
}

/// Coordinates the process lifecycle against the orchestrator and republishes
/// its notifications to the application.
pub struct LifecycleBridge {
    /// Validated, immutable process configuration.
    config: ProcessConfig,
    /// Exclusively owned orchestrator handle; `None` once released.
    client: Mutex<Option<ClientRef>>,
    /// Current lifecycle state.
    state: Mutex<LifecycleState>,
    /// Typed event channels the application subscribes to.
    sink: Arc<EventSink>,
    /// Health predicate runner.
    probe: HealthProbe,
    /// Serializes the registration and termination critical sections.
    gate: tokio::sync::Mutex<()>,
    /// Cancelled when the termination handshake starts.
    termination: CancellationToken,
}

impl LifecycleBridge {
    /// Starts building a bridge around the given configuration and client.
    ///
    /// The bridge takes exclusive ownership of the client handle: it is
    /// connected in [`initialize`](LifecycleBridge::initialize) and released
    /// at the end of the shutdown handshake.
    pub fn builder(config: ProcessConfig, client: ClientRef) -> BridgeBuilder {
        BridgeBuilder::new(config, client)
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *lock(&self.state)
    }

    /// Returns the event sink application code subscribes to and drains.
    pub fn sink(&self) -> &EventSink {
        &self.sink
    }

    /// Returns the configuration the bridge was built with.
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Returns a token that is cancelled when the termination handshake
    /// starts. Application tasks can watch it to wind down cooperatively.
    pub fn termination_token(&self) -> CancellationToken {
        self.termination.clone()
    }

    /// Connects to the orchestrator and performs the ready handshake.
    ///
    /// On success the process is advertised as able to host sessions
    /// (`Ready`). On connect failure the bridge remains `Uninitialized` and
    /// the caller must not proceed. On ready failure the bridge releases the
    /// handle and parks in `Terminated`; both failures are fatal
    /// ([`BridgeError::is_fatal`]) and carry distinct exit codes.
    pub async fn initialize(&self) -> Result<(), BridgeError> {
        let _gate = self.gate.lock().await;

        {
            let st = lock(&self.state);
            if *st != LifecycleState::Uninitialized {
                return Err(BridgeError::InitializationFailed {
                    detail: format!("bridge is already {}", st.as_label()),
                });
            }
        }

        let client = match lock(&self.client).clone() {
            Some(client) => client,
            None => {
                return Err(BridgeError::InitializationFailed {
                    detail: "orchestrator handle already released".into(),
                })
            }
        };

        if let Err(err) = client.initialize(&self.config).await {
            return Err(BridgeError::InitializationFailed {
                detail: err.to_string(),
            });
        }
        *lock(&self.state) = LifecycleState::Initializing;

        if let Err(err) = client.notify_ready(&self.config).await {
            let taken = lock(&self.client).take();
            if let Some(taken) = taken {
                taken.shutdown().await;
            }
            self.termination.cancel();
            *lock(&self.state) = LifecycleState::Terminated;
            return Err(BridgeError::ReadyNotificationFailed {
                detail: err.to_string(),
            });
        }

        *lock(&self.state) = LifecycleState::Ready;
        Ok(())
    }

    /// Handles the orchestrator's start-session callback.
    ///
    /// Confirms activation with the orchestrator, transitions to `Activated`
    /// and publishes `SessionStarted`. The session payload is forwarded
    /// verbatim.
    pub async fn dispatch_start(&self, session: SessionDescriptor) -> Result<(), BridgeError> {
        {
            let st = lock(&self.state);
            if !st.accepts_session_start() {
                return Err(BridgeError::InvalidTransition {
                    from: st.as_label(),
                    operation: "start a session",
                });
            }
        }

        let client = match lock(&self.client).clone() {
            Some(client) => client,
            None => {
                return Err(BridgeError::InvalidTransition {
                    from: LifecycleState::Terminated.as_label(),
                    operation: "start a session",
                })
            }
        };

        if let Err(err) = client.notify_activated().await {
            return Err(BridgeError::ActivationNotificationFailed {
                detail: err.to_string(),
            });
        }

        {
            // The termination handshake may have raced the activation call.
            let mut st = lock(&self.state);
            if !st.accepts_session_start() {
                return Err(BridgeError::InvalidTransition {
                    from: st.as_label(),
                    operation: "start a session",
                });
            }
            *st = LifecycleState::Activated;
        }

        self.sink.publish(Event::session_started(session));
        Ok(())
    }

    /// Handles the orchestrator's update-session callback.
    ///
    /// `wire_reason` is the orchestrator's raw reason code; a code outside
    /// the recognized set returns
    /// [`BridgeError::UnrecognizedUpdateReason`] and the update is dropped
    /// without touching session state. Valid updates publish
    /// `SessionUpdated`; the state stays `Activated`.
    pub fn dispatch_update(
        &self,
        session: SessionDescriptor,
        wire_reason: &str,
    ) -> Result<(), BridgeError> {
        let reason = UpdateReason::from_wire(wire_reason)?;

        {
            let st = lock(&self.state);
            if !st.accepts_session_update() {
                return Err(BridgeError::InvalidTransition {
                    from: st.as_label(),
                    operation: "update a session",
                });
            }
        }

        self.sink
            .publish(Event::session_updated(SessionUpdate { session, reason }));
        Ok(())
    }

    /// Handles the orchestrator's terminate callback.
    ///
    /// Runs the same handshake as [`shutdown`](LifecycleBridge::shutdown);
    /// whichever of the two arrives first performs it.
    pub async fn dispatch_terminate(&self) -> Result<(), BridgeError> {
        self.run_termination().await
    }

    /// Handles one orchestrator health probe.
    ///
    /// Runs the registered predicate under the configured soft deadline and
    /// publishes the reported status. A terminating process reports `false`
    /// without probing and without publishing: it is past its last drain.
    pub async fn health_check(&self) -> bool {
        if self.state().is_terminating() {
            return false;
        }
        let healthy = self.probe.run().await;
        self.sink.publish(Event::health_reported(healthy));
        healthy
    }

    /// Runs the shutdown handshake exactly once.
    ///
    /// The first caller (application exit path, OS signal, or the
    /// orchestrator's terminate callback) notifies the orchestrator, releases
    /// the handle, publishes `ProcessTerminating` and parks the bridge in
    /// `Terminated`. Every later call is a no-op returning `Ok`.
    ///
    /// When `notify_ending()` fails the handle is still released and
    /// [`BridgeError::EndingNotificationFailed`] is returned for the caller
    /// to log and exit non-zero.
    pub async fn shutdown(&self) -> Result<(), BridgeError> {
        self.run_termination().await
    }

    /// Waits for an OS termination signal (or an orchestrator-initiated
    /// termination) and then runs the shutdown handshake.
    ///
    /// Returns the handshake result so `main` can map it to an exit code via
    /// [`BridgeError::exit_code`].
    pub async fn run_until_signal(&self) -> Result<(), BridgeError> {
        tokio::select! {
            _ = shutdown::wait_for_shutdown_signal() => {}
            _ = self.termination.cancelled() => {}
        }
        self.shutdown().await
    }

    async fn run_termination(&self) -> Result<(), BridgeError> {
        let _gate = self.gate.lock().await;

        let prior = {
            let mut st = lock(&self.state);
            if st.is_terminal() {
                return Ok(());
            }
            let prior = *st;
            *st = LifecycleState::Terminating;
            prior
        };
        self.termination.cancel();

        let client = lock(&self.client).take();
        let outcome = match client {
            // Never registered: there is nothing to tell the orchestrator.
            Some(_) if prior == LifecycleState::Uninitialized => Ok(()),
            None => Ok(()),
            Some(client) => {
                let notified = client.notify_ending().await;
                client.shutdown().await;
                notified.map_err(|err| BridgeError::EndingNotificationFailed {
                    detail: err.to_string(),
                })
            }
        };

        self.sink.publish(Event::process_terminating());
        *lock(&self.state) = LifecycleState::Terminated;
        outcome
    }
}
