//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change a default threshold, only edit this file.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "HostShield";

/// Default reporting threshold (percent, 0-100)
///
/// Surfaced in statistics reports. Detectors fire on their own
/// per-rule thresholds independent of this value.
pub const DEFAULT_THREAT_THRESHOLD: u32 = 70;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get the initial reporting threshold from environment or use default
///
/// Values outside 0-100 fall back to the default.
pub fn initial_threat_threshold() -> u32 {
    std::env::var("HOSTSHIELD_THREAT_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|v| *v <= 100)
        .unwrap_or(DEFAULT_THREAT_THRESHOLD)
}
