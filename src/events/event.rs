//! # Lifecycle events republished to the application.
//!
//! The [`EventKind`] enum classifies the four notifications the bridge relays:
//! session start, session update, process termination, and health probes.
//! The [`Event`] struct carries the kind-dependent payload plus ordering and
//! timing metadata.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically in publish order. Within one delivery queue, drain order
//! equals publish order; `seq` makes the causal order checkable after the
//! fact.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::session::{SessionDescriptor, SessionUpdate};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The orchestrator placed a session on this process and the activation
    /// notification was accepted.
    ///
    /// Sets:
    /// - `session`: the session payload
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SessionStarted,

    /// The orchestrator updated the in-progress session (backfill outcome or
    /// refreshed matchmaker data).
    ///
    /// Sets:
    /// - `update`: descriptor plus recognized reason
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SessionUpdated,

    /// The process is entering its termination handshake, whether the
    /// orchestrator or the application initiated it.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ProcessTerminating,

    /// A health probe ran; `healthy` is the status that was reported back.
    ///
    /// Sets:
    /// - `healthy`: reported status
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    HealthCheckRequested,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::SessionStarted => "session_started",
            EventKind::SessionUpdated => "session_updated",
            EventKind::ProcessTerminating => "process_terminating",
            EventKind::HealthCheckRequested => "health_check_requested",
        }
    }
}

/// Lifecycle event with kind-dependent payload.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - payload fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Session payload (`SessionStarted`).
    pub session: Option<SessionDescriptor>,
    /// Session update payload (`SessionUpdated`).
    pub update: Option<SessionUpdate>,
    /// Reported health status (`HealthCheckRequested`).
    pub healthy: Option<bool>,
}

impl Event {
    fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            session: None,
            update: None,
            healthy: None,
        }
    }

    /// Creates a session start event carrying the placed session.
    pub fn session_started(session: SessionDescriptor) -> Self {
        let mut ev = Event::new(EventKind::SessionStarted);
        ev.session = Some(session);
        ev
    }

    /// Creates a session update event carrying the descriptor and reason.
    pub fn session_updated(update: SessionUpdate) -> Self {
        let mut ev = Event::new(EventKind::SessionUpdated);
        ev.update = Some(update);
        ev
    }

    /// Creates a termination event.
    pub fn process_terminating() -> Self {
        Event::new(EventKind::ProcessTerminating)
    }

    /// Creates a health probe event carrying the reported status.
    pub fn health_reported(healthy: bool) -> Self {
        let mut ev = Event::new(EventKind::HealthCheckRequested);
        ev.healthy = Some(healthy);
        ev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::process_terminating();
        let b = Event::process_terminating();
        let c = Event::health_reported(true);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn test_payload_matches_kind() {
        let session = SessionDescriptor::new("payload");
        let ev = Event::session_started(session.clone());
        assert_eq!(ev.kind, EventKind::SessionStarted);
        assert_eq!(ev.session.as_ref(), Some(&session));
        assert!(ev.update.is_none());
        assert!(ev.healthy.is_none());

        let ev = Event::health_reported(false);
        assert_eq!(ev.kind, EventKind::HealthCheckRequested);
        assert_eq!(ev.healthy, Some(false));
    }
}
