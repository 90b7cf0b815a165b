//! # Exponential Backoff
//!
//! Per-object retry delays for failed reconciliations. Each failure doubles the
//! delay, starting at `start` and capped at `max`. The reconciler drops the
//! state of an object on success.
//!
//! ## Usage
//!
//! ```rust
//! use glue_job_controller::controller::backoff::ExponentialBackoff;
//! use std::time::Duration;
//!
//! let mut backoff = ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(5));
//! assert_eq!(backoff.next_backoff(), Duration::from_secs(1));
//! assert_eq!(backoff.next_backoff(), Duration::from_secs(2));
//! assert_eq!(backoff.next_backoff(), Duration::from_secs(4));
//! assert_eq!(backoff.next_backoff(), Duration::from_secs(5));
//! ```

use std::time::Duration;

/// Exponential backoff calculator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExponentialBackoff {
    current: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    /// Create a backoff starting at `start` and never exceeding `max`
    #[must_use]
    pub fn new(start: Duration, max: Duration) -> Self {
        Self {
            current: start.min(max),
            max,
        }
    }

    /// Get the next backoff duration and advance the sequence
    pub fn next_backoff(&mut self) -> Duration {
        let result = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        result
    }
}
