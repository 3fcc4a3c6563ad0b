//! # Health probe with a local soft deadline.
//!
//! The orchestrator probes the process periodically and enforces its own hard
//! timeout (documented as 60 seconds), after which it records the process as
//! unhealthy. [`HealthProbe`] runs the application's predicate on a blocking
//! worker under a much shorter local deadline so a stuck predicate is
//! reported as `false` well before the external limit trips.
//!
//! With no predicate registered the probe reports healthy: an absent health
//! hook means the application opted out of health reporting, not that the
//! process is failing.

use std::sync::Arc;
use std::time::Duration;

use tokio::{task, time};

/// Application-supplied health predicate.
pub type HealthPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Runs the registered health predicate under a soft deadline.
pub(crate) struct HealthProbe {
    predicate: Option<HealthPredicate>,
    deadline: Duration,
}

impl HealthProbe {
    pub fn new(predicate: Option<HealthPredicate>, deadline: Duration) -> Self {
        Self {
            predicate,
            deadline,
        }
    }

    /// Runs one probe and returns the status to report.
    ///
    /// `false` when the predicate misses the deadline or panics; the probe
    /// itself always returns within the deadline.
    pub async fn run(&self) -> bool {
        let Some(predicate) = self.predicate.clone() else {
            return true;
        };

        let attempt = task::spawn_blocking(move || predicate());
        match time::timeout(self.deadline, attempt).await {
            Ok(Ok(healthy)) => healthy,
            Ok(Err(join_err)) => {
                eprintln!("[fleetvisor] health predicate panicked: {join_err}");
                false
            }
            Err(_elapsed) => {
                eprintln!(
                    "[fleetvisor] health predicate missed the {:?} deadline; reporting unhealthy",
                    self.deadline
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_predicate_reports_healthy() {
        let probe = HealthProbe::new(None, Duration::from_millis(50));
        assert!(probe.run().await);
    }

    #[tokio::test]
    async fn test_predicate_result_is_forwarded() {
        let probe = HealthProbe::new(Some(Arc::new(|| false)), Duration::from_secs(1));
        assert!(!probe.run().await);

        let probe = HealthProbe::new(Some(Arc::new(|| true)), Duration::from_secs(1));
        assert!(probe.run().await);
    }

    #[tokio::test]
    async fn test_slow_predicate_misses_deadline() {
        let probe = HealthProbe::new(
            Some(Arc::new(|| {
                std::thread::sleep(Duration::from_millis(300));
                true
            })),
            Duration::from_millis(10),
        );
        assert!(!probe.run().await);
    }

    #[tokio::test]
    async fn test_panicking_predicate_reports_unhealthy() {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));
        let probe = HealthProbe::new(
            Some(Arc::new(|| panic!("predicate bug"))),
            Duration::from_secs(1),
        );
        let healthy = probe.run().await;
        std::panic::set_hook(previous);
        assert!(!healthy);
    }
}
