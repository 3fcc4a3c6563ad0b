//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] attaches stdout observers to every sink channel, printing
//! events in a human-readable format.
//!
//! ## Output format
//! ```text
//! [session-started] session={"sessionId":"s-1"}
//! [session-updated] reason=backfill_timed_out session={"sessionId":"s-1"}
//! [process-terminating]
//! [health-check] healthy=true
//! ```

use super::EventSink;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event lines to
/// stdout for debugging and demonstration purposes.
///
/// Not intended for production use - subscribe your own handlers for
/// structured logging or metrics collection.
pub struct LogWriter;

impl LogWriter {
    /// Subscribes a stdout observer to each of the sink's channels.
    ///
    /// Call during startup, before other subscribers if the log lines should
    /// lead each dispatch pass.
    pub fn attach(sink: &EventSink) {
        sink.on_session_started(|session| {
            println!("[session-started] session={session}");
        });
        sink.on_session_updated(|update| {
            println!(
                "[session-updated] reason={} session={}",
                update.reason.as_label(),
                update.session
            );
        });
        sink.on_process_terminating(|| {
            println!("[process-terminating]");
        });
        sink.on_health_check_requested(|healthy| {
            println!("[health-check] healthy={healthy}");
        });
    }
}
