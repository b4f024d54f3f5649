//! Structured logging for poll cycles
//!
//! Events carry an `event` field so JSON log output can be filtered the
//! same way across commands.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::executor::ExecutorError;

/// Structured logger for poll cycle events
#[derive(Debug, Clone)]
pub struct PollLogger {
    namespace: String,
}

impl PollLogger {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Log the start of a poll cycle
    pub fn log_poll_started(&self, source: &str) {
        debug!(
            event = "poll_started",
            namespace = %self.namespace,
            source = %source,
            "Polling cluster"
        );
    }

    /// Log a completed poll cycle
    pub fn log_poll_completed(
        &self,
        pods: usize,
        nodes: usize,
        metrics_available: bool,
        elapsed: Duration,
    ) {
        info!(
            event = "poll_completed",
            namespace = %self.namespace,
            pods = pods,
            nodes = nodes,
            metrics_available = metrics_available,
            elapsed_ms = elapsed.as_millis() as u64,
            "Poll cycle complete"
        );
    }

    /// Log a fetch that produced no data
    pub fn log_fetch_failed(&self, source: &str, error: &ExecutorError) {
        warn!(
            event = "fetch_failed",
            namespace = %self.namespace,
            source = %source,
            error = %error,
            "Cluster fetch failed, treating as no data"
        );
    }

    /// Log a fetch that succeeded with empty output
    pub fn log_fetch_empty(&self, source: &str) {
        debug!(
            event = "fetch_empty",
            namespace = %self.namespace,
            source = %source,
            "Cluster fetch returned no output"
        );
    }
}
