//! Dispatch observability.
//!
//! Submission and reservation counts are an observer capability injected
//! into the dispatch path, not process-global state. The broker calls the
//! trait on every accepted submission; what the implementation does with
//! the numbers is its own business.

use std::collections::HashMap;
use std::sync::Mutex;

/// Observer notified about accepted submissions, labeled by queue.
pub trait DispatchMetrics: Send + Sync {
    /// A job was accepted onto `queue`.
    fn job_submitted(&self, queue: &str);

    /// An accepted submission carried a reservation request for `queue`.
    fn reservation_requested(&self, queue: &str);
}

/// In-process per-queue counters.
#[derive(Debug, Default)]
pub struct CounterMetrics {
    jobs: Mutex<HashMap<String, u64>>,
    reservations: Mutex<HashMap<String, u64>>,
}

impl CounterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total jobs accepted onto `queue` since startup.
    pub fn jobs_submitted(&self, queue: &str) -> u64 {
        self.jobs
            .lock()
            .expect("metrics mutex poisoned")
            .get(queue)
            .copied()
            .unwrap_or(0)
    }

    /// Total reservation submissions for `queue` since startup.
    pub fn reservations_requested(&self, queue: &str) -> u64 {
        self.reservations
            .lock()
            .expect("metrics mutex poisoned")
            .get(queue)
            .copied()
            .unwrap_or(0)
    }
}

impl DispatchMetrics for CounterMetrics {
    fn job_submitted(&self, queue: &str) {
        let mut jobs = self.jobs.lock().expect("metrics mutex poisoned");
        *jobs.entry(queue.to_string()).or_insert(0) += 1;
    }

    fn reservation_requested(&self, queue: &str) {
        let mut reservations = self.reservations.lock().expect("metrics mutex poisoned");
        *reservations.entry(queue.to_string()).or_insert(0) += 1;
    }
}
