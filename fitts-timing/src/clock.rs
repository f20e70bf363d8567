use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A reading taken when a target is presented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamp {
    /// Monotonic nanoseconds since the clock was created.
    pub monotonic_ns: u64,
    /// Wall-clock seconds since the Unix epoch.
    pub epoch_secs: f64,
}

/// Time source for trial timing.
///
/// Elapsed times come from the monotonic reading; the wall-clock reading is only
/// stored in the trial log.
pub trait Clock: Clone {
    fn now(&self) -> Timestamp;

    fn elapsed(&self, since: Timestamp) -> Duration {
        Duration::from_nanos(self.now().monotonic_ns.saturating_sub(since.monotonic_ns))
    }
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    pub start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp {
            monotonic_ns: self.start.elapsed().as_nanos() as u64,
            epoch_secs: Utc::now().timestamp_micros() as f64 / 1e6,
        }
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one handle
/// and advance it while the session owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    epoch_origin: f64,
    now_ns: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(epoch_origin: f64) -> Self {
        Self {
            epoch_origin,
            now_ns: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1_700_000_000.0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let ns = self.now_ns.load(Ordering::SeqCst);
        Timestamp {
            monotonic_ns: ns,
            epoch_secs: self.epoch_origin + ns as f64 / 1e9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(100.0);
        let handle = clock.clone();
        let t0 = clock.now();
        handle.advance(Duration::from_millis(1500));
        assert_eq!(clock.elapsed(t0), Duration::from_millis(1500));
        assert!((clock.now().epoch_secs - 101.5).abs() < 1e-9);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b.monotonic_ns >= a.monotonic_ns);
        assert!(a.epoch_secs > 1_600_000_000.0);
    }
}
