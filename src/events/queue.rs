//! # Delivery queue between callback threads and the application tick.
//!
//! [`DeliveryQueue`] is a thin wrapper around a bounded
//! [`tokio::sync::mpsc`] channel that carries [`Event`]s from whichever
//! thread the orchestrator client invokes callbacks on to the single thread
//! that drains them.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` uses `try_send` and never waits.
//! - **Bounded capacity**: on overflow the event is dropped for all
//!   subscribers and a warning is logged (minimum capacity 1, clamped).
//! - **Single consumer**: `drain_into()` empties the queue in FIFO order;
//!   publish order is preserved end to end.
//! - **No persistence**: events drained before any subscriber existed are
//!   dispatched to nobody.

use std::sync::Mutex;

use tokio::sync::mpsc;

use super::event::Event;

/// Bounded FIFO channel for lifecycle events.
///
/// Publishers may call [`publish`](DeliveryQueue::publish) from any thread;
/// draining is serialized through an internal lock so exactly one consumer
/// empties the queue at a time.
pub struct DeliveryQueue {
    tx: mpsc::Sender<Event>,
    rx: Mutex<mpsc::Receiver<Event>>,
}

impl DeliveryQueue {
    /// Creates a new queue with the given capacity (clamped to a minimum of 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel::<Event>(capacity.max(1));
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Enqueues an event without blocking.
    ///
    /// Returns `false` and logs a warning if the queue is full; the event is
    /// lost for all subscribers in that case.
    pub fn publish(&self, ev: Event) -> bool {
        match self.tx.try_send(ev) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(ev)) => {
                eprintln!(
                    "[fleetvisor] event dropped: queue full (kind={}, seq={})",
                    ev.kind.as_label(),
                    ev.seq
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(ev)) => {
                eprintln!(
                    "[fleetvisor] event dropped: queue closed (kind={}, seq={})",
                    ev.kind.as_label(),
                    ev.seq
                );
                false
            }
        }
    }

    /// Drains every queued event in FIFO order into `consume`.
    ///
    /// Returns the number of events handed out. Never blocks: the call stops
    /// as soon as the queue is observed empty.
    pub fn drain_into(&self, mut consume: impl FnMut(Event)) -> usize {
        let mut rx = self
            .rx
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut drained = 0;
        while let Ok(ev) = rx.try_recv() {
            consume(ev);
            drained += 1;
        }
        drained
    }
}
