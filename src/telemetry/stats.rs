//! Engine Statistics
//!
//! Process-wide counters: events observed and threats flagged, plus the
//! adjustable reporting threshold. Counters only ever increase within a
//! run; readers never block writers. The two counters are not updated as
//! one transaction, so a snapshot may observe a threat the event counter
//! has not caught up with yet.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::constants::{initial_threat_threshold, DEFAULT_THREAT_THRESHOLD};

// ============================================================================
// ENGINE STATS
// ============================================================================

/// Concurrent statistics aggregator
///
/// Instantiable so tests can count in isolation; production code shares
/// the [`global()`] instance.
#[derive(Debug)]
pub struct EngineStats {
    events_logged: AtomicU64,
    threats_detected: AtomicU64,
    /// Reporting threshold in percent (0-100)
    threat_threshold: AtomicU32,
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub events_logged: u64,
    pub threats_detected: u64,
    pub detection_rate: f64,
    pub threat_threshold: u32,
}

impl Default for EngineStats {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineStats {
    /// Fresh counters with the default reporting threshold
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_THREAT_THRESHOLD)
    }

    /// Fresh counters with a specific reporting threshold
    pub fn with_threshold(percent: u32) -> Self {
        Self {
            events_logged: AtomicU64::new(0),
            threats_detected: AtomicU64::new(0),
            threat_threshold: AtomicU32::new(percent.min(100)),
        }
    }

    /// Count one ingested event
    pub fn record_event(&self) {
        self.events_logged.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one detector firing
    pub fn record_threat(&self) {
        self.threats_detected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn events_logged(&self) -> u64 {
        self.events_logged.load(Ordering::Relaxed)
    }

    pub fn threats_detected(&self) -> u64 {
        self.threats_detected.load(Ordering::Relaxed)
    }

    /// Threats per hundred events; 0.0 before the first event
    pub fn detection_rate(&self) -> f64 {
        let events = self.events_logged();
        if events == 0 {
            return 0.0;
        }
        self.threats_detected() as f64 / events as f64 * 100.0
    }

    pub fn threat_threshold(&self) -> u32 {
        self.threat_threshold.load(Ordering::Relaxed)
    }

    /// Adjust the reporting threshold. Rejects values above 100.
    pub fn set_threat_threshold(&self, percent: u32) -> bool {
        if percent > 100 {
            log::warn!("Rejected threat threshold {}% (valid range 0-100)", percent);
            return false;
        }
        self.threat_threshold.store(percent, Ordering::Relaxed);
        log::info!("Threat threshold set to {}%", percent);
        true
    }

    /// Point-in-time view of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            events_logged: self.events_logged(),
            threats_detected: self.threats_detected(),
            detection_rate: self.detection_rate(),
            threat_threshold: self.threat_threshold(),
        }
    }

    /// Fixed-format text report. The layout is a stable contract for
    /// external monitoring consumers.
    pub fn render_report(&self) -> String {
        let snap = self.snapshot();
        format!(
            "HostShield Engine Statistics\n\
             ============================\n\
             Events Logged: {}\n\
             Threats Detected: {}\n\
             Detection Rate: {:.2}%\n\
             Threat Threshold: {}%\n",
            snap.events_logged, snap.threats_detected, snap.detection_rate, snap.threat_threshold
        )
    }
}

// ============================================================================
// GLOBAL INSTANCE
// ============================================================================

static STATS: Lazy<Arc<EngineStats>> =
    Lazy::new(|| Arc::new(EngineStats::with_threshold(initial_threat_threshold())));

/// Handle to the process-wide statistics instance
pub fn global() -> Arc<EngineStats> {
    STATS.clone()
}

/// Snapshot of the process-wide statistics
pub fn snapshot() -> StatsSnapshot {
    STATS.snapshot()
}

/// Render the process-wide statistics report
pub fn report() -> String {
    STATS.render_report()
}

/// Adjust the process-wide reporting threshold (0-100)
pub fn set_threat_threshold(percent: u32) -> bool {
    STATS.set_threat_threshold(percent)
}

// ============================================================================
// TESTS
// ============================================================================
