//! HostShield Core - Threat Scoring & Behavioral Anomaly Engine
//!
//! Hai đường phát hiện độc lập:
//! - `scoring/` - On-demand URL artifact evaluation (feature extraction + confidence)
//! - `monitor/` - Event-driven behavioral detectors (12 detectors, observe-only)
//!
//! Cả hai đẩy số liệu vào `telemetry/` (counters, report, export).

// Core modules
pub mod constants;
pub mod fingerprint;
pub mod scoring;
pub mod monitor;
pub mod telemetry;

// Re-export the main entry points at crate root
pub use fingerprint::fingerprint;
pub use monitor::{BehaviorMonitor, Finding, SecurityEvent, SyscallKind};
pub use scoring::{classify, classify_batch, classify_with_context, ThreatVerdict};
pub use telemetry::{EngineStats, StatsSnapshot};
