//! Bounded polling.

use std::ops::Range;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A fixed attempt budget with a fixed pause after each unsuccessful attempt.
///
/// Callers drive the loop themselves:
///
/// ```rust,no_run
/// # use std::time::Duration;
/// # use cmflash::Retry;
/// # async fn probe() -> bool { true }
/// # async fn example() {
/// let retry = Retry::new(4, Duration::from_secs(30));
/// for _ in retry.attempts() {
///     if probe().await {
///         break;
///     }
///     retry.pause().await;
/// }
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retry {
    /// Maximum number of attempts.
    pub attempts: u32,

    /// Pause after each unsuccessful attempt, the last one included.
    pub interval: Duration,
}

impl Retry {
    /// Create a retry budget.
    pub const fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    /// Zero-based attempt numbers within the budget.
    pub fn attempts(&self) -> Range<u32> {
        0..self.attempts
    }

    /// Sleep for one interval.
    pub async fn pause(&self) {
        tokio::time::sleep(self.interval).await;
    }

    /// Time elapsed before attempt `n` (zero-based) starts, ignoring the
    /// attempts' own duration.
    pub fn elapsed_before(&self, attempt: u32) -> Duration {
        self.interval * attempt
    }
}
