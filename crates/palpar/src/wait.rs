//! Bounded polling waits.
//!
//! UI elements render late; a lookup that fails right now often succeeds a
//! few hundred milliseconds later. [`await_condition`] turns that flakiness
//! into a bounded retry loop: probe, sleep, probe again, give up at the
//! deadline. Exhausting the timeout is an expected outcome (`None`), not an
//! error.

use std::time::{Duration, Instant};

/// Default total wait timeout (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Options for polling waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Outcome of a wait, with the time it took.
#[derive(Debug, Clone)]
pub struct WaitReport<T> {
    /// The probed value, if it appeared before the deadline
    pub value: Option<T>,
    /// Time spent polling
    pub elapsed: Duration,
    /// Number of probe attempts
    pub attempts: u32,
}

impl<T> WaitReport<T> {
    /// Whether the wait succeeded.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.value.is_some()
    }
}

/// Poll `probe` until it yields a value or `timeout` elapses.
///
/// The probe runs at least once, so a zero timeout still checks the current
/// state. The loop blocks the calling thread between probes; there is no
/// cancellation once it starts.
pub fn await_condition<T>(
    probe: impl FnMut() -> Option<T>,
    interval: Duration,
    timeout: Duration,
) -> Option<T> {
    await_condition_report(probe, interval, timeout).value
}

/// Like [`await_condition`], reporting elapsed time and attempt count.
pub fn await_condition_report<T>(
    mut probe: impl FnMut() -> Option<T>,
    interval: Duration,
    timeout: Duration,
) -> WaitReport<T> {
    let started = Instant::now();
    let deadline = started + timeout;
    let mut attempts = 0_u32;
    loop {
        attempts += 1;
        if let Some(value) = probe() {
            return WaitReport {
                value: Some(value),
                elapsed: started.elapsed(),
                attempts,
            };
        }
        let now = Instant::now();
        if now >= deadline {
            return WaitReport {
                value: None,
                elapsed: started.elapsed(),
                attempts,
            };
        }
        std::thread::sleep(interval.min(deadline - now));
    }
}
