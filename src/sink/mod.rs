//! # EventSink: typed channels with isolated, tick-driven dispatch.
//!
//! [`EventSink`] is where application code observes the lifecycle. It exposes
//! one subscribe operation per channel and a [`drain`](EventSink::drain) call
//! the application invokes at the start of each tick.
//!
//! ## What it guarantees
//! - Per-channel invocation order = subscription order.
//! - Each queued event is dispatched exactly once per subscriber.
//! - A panicking handler is caught and logged; remaining handlers still run.
//! - FIFO across channels: events are dispatched in publish order, so a
//!   session start is always observed before the updates that follow it.
//!
//! ## What it does **not** guarantee
//! - No delivery without draining: events queued after the final drain are
//!   never observed.
//! - No replay: subscribing after an event was drained does not deliver it.
//!
//! ## Diagram
//! ```text
//!    publish(Event)            drain()  (application tick, one thread)
//!        │                        │
//!        ▼                        ▼
//!   [delivery queue]  ──►  dispatch per event kind
//!                             ├─► session-started handlers   (in order)
//!                             ├─► session-updated handlers   (in order)
//!                             ├─► process-terminating handlers
//!                             └─► health-check handlers
//! ```

#[cfg(feature = "logging")]
mod log;

#[cfg(feature = "logging")]
pub use log::LogWriter;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use crate::events::{DeliveryQueue, Event, EventKind};
use crate::session::{SessionDescriptor, SessionUpdate};

/// One subscription channel: an ordered list of shared handlers.
struct Channel<H: ?Sized> {
    name: &'static str,
    handlers: RwLock<Vec<Arc<H>>>,
}

impl<H: ?Sized> Channel<H> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: RwLock::new(Vec::new()),
        }
    }

    fn subscribe(&self, handler: Arc<H>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    /// Snapshot so a handler that subscribes re-entrantly cannot deadlock
    /// the dispatch pass.
    fn snapshot(&self) -> Vec<Arc<H>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Invokes every handler in subscription order, isolating panics.
    fn invoke_each(&self, call: impl Fn(&H)) {
        for (index, handler) in self.snapshot().iter().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| call(handler.as_ref())));
            if outcome.is_err() {
                eprintln!(
                    "[fleetvisor] subscriber #{index} on '{}' panicked; continuing dispatch",
                    self.name
                );
            }
        }
    }
}

/// Typed publish/subscribe surface between the bridge and application code.
///
/// Subscribe during startup (before the bridge is initialized), then call
/// [`drain`](EventSink::drain) once per application tick. Subscribing is
/// thread-safe; draining is intended for the single main-loop thread.
pub struct EventSink {
    queue: DeliveryQueue,
    started: Channel<dyn Fn(&SessionDescriptor) + Send + Sync>,
    updated: Channel<dyn Fn(&SessionUpdate) + Send + Sync>,
    terminating: Channel<dyn Fn() + Send + Sync>,
    health: Channel<dyn Fn(bool) + Send + Sync>,
}

impl EventSink {
    pub(crate) fn new(queue_capacity: usize) -> Self {
        Self {
            queue: DeliveryQueue::new(queue_capacity),
            started: Channel::new("session-started"),
            updated: Channel::new("session-updated"),
            terminating: Channel::new("process-terminating"),
            health: Channel::new("health-check"),
        }
    }

    /// Subscribes to session placements. The handler receives the opaque
    /// session payload exactly as the orchestrator delivered it.
    pub fn on_session_started(
        &self,
        handler: impl Fn(&SessionDescriptor) + Send + Sync + 'static,
    ) {
        self.started.subscribe(Arc::new(handler));
    }

    /// Subscribes to updates of the in-progress session.
    pub fn on_session_updated(&self, handler: impl Fn(&SessionUpdate) + Send + Sync + 'static) {
        self.updated.subscribe(Arc::new(handler));
    }

    /// Subscribes to the termination notice published when the shutdown
    /// handshake begins.
    pub fn on_process_terminating(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.terminating.subscribe(Arc::new(handler));
    }

    /// Subscribes to health probe results. The handler observes the status
    /// that was reported to the orchestrator; it does not influence it — the
    /// health *predicate* is registered on the bridge builder.
    pub fn on_health_check_requested(&self, handler: impl Fn(bool) + Send + Sync + 'static) {
        self.health.subscribe(Arc::new(handler));
    }

    /// Enqueues an event for the next drain (non-blocking, drop on overflow).
    pub(crate) fn publish(&self, ev: Event) {
        self.queue.publish(ev);
    }

    /// Dispatches every queued event to its channel's subscribers, in publish
    /// order, and returns the number of events dispatched.
    ///
    /// Call once per application tick from the main-loop thread.
    pub fn drain(&self) -> usize {
        self.queue.drain_into(|ev| self.dispatch(&ev))
    }

    fn dispatch(&self, ev: &Event) {
        match ev.kind {
            EventKind::SessionStarted => {
                if let Some(session) = &ev.session {
                    self.started.invoke_each(|handler| handler(session));
                }
            }
            EventKind::SessionUpdated => {
                if let Some(update) = &ev.update {
                    self.updated.invoke_each(|handler| handler(update));
                }
            }
            EventKind::ProcessTerminating => {
                self.terminating.invoke_each(|handler| handler());
            }
            EventKind::HealthCheckRequested => {
                if let Some(healthy) = ev.healthy {
                    self.health.invoke_each(|handler| handler(healthy));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorded(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    fn recorder(
        log: &Arc<Mutex<Vec<String>>>,
        tag: &'static str,
    ) -> impl Fn() + Send + Sync + 'static {
        let log = Arc::clone(log);
        move || log.lock().unwrap().push(tag.to_string())
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let sink = EventSink::new(8);
        let log = Arc::new(Mutex::new(Vec::new()));

        sink.on_process_terminating(recorder(&log, "first"));
        sink.on_process_terminating(recorder(&log, "second"));
        sink.on_process_terminating(recorder(&log, "third"));

        sink.publish(Event::process_terminating());
        assert_eq!(sink.drain(), 1);
        assert_eq!(recorded(&log), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_dispatch_preserves_publish_order_across_channels() {
        let sink = EventSink::new(8);
        let log = Arc::new(Mutex::new(Vec::new()));

        {
            let log = Arc::clone(&log);
            sink.on_session_started(move |session| {
                log.lock().unwrap().push(format!("started:{session}"));
            });
        }
        {
            let log = Arc::clone(&log);
            sink.on_session_updated(move |update| {
                log.lock().unwrap().push(format!("updated:{}", update.reason.as_label()));
            });
        }
        sink.on_process_terminating(recorder(&log, "terminating"));

        sink.publish(Event::session_started(SessionDescriptor::new("s-1")));
        sink.publish(Event::session_updated(SessionUpdate {
            session: SessionDescriptor::new("s-1"),
            reason: crate::session::UpdateReason::BackfillFailed,
        }));
        sink.publish(Event::process_terminating());

        assert_eq!(sink.drain(), 3);
        assert_eq!(
            recorded(&log),
            vec!["started:s-1", "updated:backfill_failed", "terminating"]
        );
    }

    #[test]
    fn test_panicking_handler_does_not_stop_dispatch() {
        let sink = EventSink::new(8);
        let log = Arc::new(Mutex::new(Vec::new()));

        sink.on_process_terminating(|| panic!("subscriber bug"));
        sink.on_process_terminating(recorder(&log, "survivor"));

        // Silence the default panic hook for the intentional panic above.
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));
        sink.publish(Event::process_terminating());
        let drained = sink.drain();
        std::panic::set_hook(previous);

        assert_eq!(drained, 1);
        assert_eq!(recorded(&log), vec!["survivor"]);
    }

    #[test]
    fn test_each_event_is_delivered_exactly_once() {
        let sink = EventSink::new(8);
        let log = Arc::new(Mutex::new(Vec::new()));
        sink.on_process_terminating(recorder(&log, "seen"));

        sink.publish(Event::process_terminating());
        assert_eq!(sink.drain(), 1);
        assert_eq!(sink.drain(), 0);
        assert_eq!(recorded(&log), vec!["seen"]);
    }

    #[test]
    fn test_health_status_reaches_observers() {
        let sink = EventSink::new(8);
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let log = Arc::clone(&log);
            sink.on_health_check_requested(move |healthy| {
                log.lock().unwrap().push(format!("healthy={healthy}"));
            });
        }

        sink.publish(Event::health_reported(true));
        sink.publish(Event::health_reported(false));
        assert_eq!(sink.drain(), 2);
        assert_eq!(recorded(&log), vec!["healthy=true", "healthy=false"]);
    }

    #[test]
    fn test_overflow_drops_for_all_subscribers() {
        let sink = EventSink::new(1);
        let log = Arc::new(Mutex::new(Vec::new()));
        sink.on_process_terminating(recorder(&log, "tick"));

        sink.publish(Event::process_terminating());
        sink.publish(Event::process_terminating());
        assert_eq!(sink.drain(), 1);
        assert_eq!(recorded(&log), vec!["tick"]);
    }
}
