//! Counter Policies
//!
//! The three stateful strategies behind the volume and timing detectors.
//! Two divergent counting policies coexist on purpose: monotonic counters
//! never reset and re-fire on every event past the threshold, while
//! edge-triggered counters start over after each firing. Callers pick the
//! policy per detector; the strategies are interchangeable objects.

use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// MONOTONIC COUNTER
// ============================================================================

/// Running count that never resets
///
/// Once the count passes the threshold, every further event reports a
/// firing for the remaining lifetime of the counter.
#[derive(Debug)]
pub struct MonotonicCounter {
    count: AtomicU64,
    threshold: u64,
}

impl MonotonicCounter {
    pub fn new(threshold: u64) -> Self {
        Self {
            count: AtomicU64::new(0),
            threshold,
        }
    }

    /// Count one occurrence; true when the running count exceeds the threshold
    pub fn record(&self) -> bool {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        count > self.threshold
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

// ============================================================================
// EDGE-TRIGGERED COUNTER
// ============================================================================

/// Running count that resets to zero each time it fires
///
/// Fires exactly when an increment crosses the threshold, then starts the
/// next cycle from zero. The compare-exchange loop keeps concurrent
/// increments from being lost across a reset: every event either advances
/// the count by one or consumes a full cycle.
#[derive(Debug)]
pub struct EdgeTriggeredCounter {
    count: AtomicU64,
    threshold: u64,
}

impl EdgeTriggeredCounter {
    pub fn new(threshold: u64) -> Self {
        Self {
            count: AtomicU64::new(0),
            threshold,
        }
    }

    /// Count one occurrence; true exactly on the increment that crosses
    /// the threshold
    pub fn record(&self) -> bool {
        loop {
            let current = self.count.load(Ordering::Relaxed);
            let next = current + 1;
            let (store, fired) = if next > self.threshold {
                (0, true)
            } else {
                (next, false)
            };
            if self
                .count
                .compare_exchange_weak(current, store, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return fired;
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

// ============================================================================
// GLOBAL GAP TRACKER
// ============================================================================

/// Single shared last-occurrence timestamp
///
/// One slot for all entities: any two occurrences closer than the window,
/// regardless of origin, count as rapid. The slot starts at zero, so the
/// first realistic timestamp can never fire. Timestamps that go backwards
/// wrap around and read as a huge gap, which also never fires.
#[derive(Debug)]
pub struct GlobalGapTracker {
    last_ms: AtomicU64,
    window_ms: u64,
}

impl GlobalGapTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            last_ms: AtomicU64::new(0),
            window_ms,
        }
    }

    /// Record an occurrence at `now_ms`; true when the gap since the
    /// previous occurrence is below the window
    pub fn record(&self, now_ms: u64) -> bool {
        let last = self.last_ms.swap(now_ms, Ordering::Relaxed);
        now_ms.wrapping_sub(last) < self.window_ms
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_monotonic_fires_past_threshold_and_keeps_firing() {
        let counter = MonotonicCounter::new(1000);

        let mut firing_positions = Vec::new();
        for event_no in 1..=1005u64 {
            if counter.record() {
                firing_positions.push(event_no);
            }
        }

        assert_eq!(firing_positions, vec![1001, 1002, 1003, 1004, 1005]);
        assert_eq!(counter.count(), 1005);
    }

    #[test]
    fn test_edge_triggered_fires_once_per_cycle() {
        let counter = EdgeTriggeredCounter::new(100);

        let mut firing_positions = Vec::new();
        for event_no in 1..=250u64 {
            if counter.record() {
                firing_positions.push(event_no);
            }
        }

        // A cycle consumes 101 events: 100 increments plus the firing one
        assert_eq!(firing_positions, vec![101, 202]);
        assert_eq!(counter.count(), 48);
    }

    #[test]
    fn test_edge_triggered_concurrent_cycles_are_exact() {
        let counter = Arc::new(EdgeTriggeredCounter::new(100));
        let total_fires = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let counter = counter.clone();
            let total_fires = total_fires.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..125 {
                    if counter.record() {
                        total_fires.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 1000 events, 101 consumed per firing: 9 firings, 91 left over
        assert_eq!(total_fires.load(Ordering::Relaxed), 9);
        assert_eq!(counter.count(), 91);
    }

    #[test]
    fn test_gap_tracker_window() {
        let tracker = GlobalGapTracker::new(100);
        let base: u64 = 1_700_000_000_000;

        // First occurrence measures against the empty slot
        assert!(!tracker.record(base));
        assert!(tracker.record(base + 50));
        assert!(!tracker.record(base + 250));
        assert!(tracker.record(base + 349));
        // Gap equal to the window is not rapid
        assert!(!tracker.record(base + 449));
    }

    #[test]
    fn test_gap_tracker_backwards_time_never_fires() {
        let tracker = GlobalGapTracker::new(100);
        assert!(!tracker.record(5000));
        assert!(!tracker.record(4990));
    }
}
