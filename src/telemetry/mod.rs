//! Telemetry Module
//!
//! Engine statistics and findings export. Without the counters you can't:
//! - See how noisy the detector set is
//! - Audit what the engine flagged and when
//!
//! ## Structure
//! - `stats.rs` - Lock-free event/threat counters + text report
//! - `exporter.rs` - Export findings to formats (JSONL, CSV, JSON)
//!
//! ## Usage
//! ```ignore
//! use hostshield_core::telemetry::{self, ExportFormat};
//!
//! let snapshot = telemetry::snapshot();
//! println!("{}", telemetry::report());
//!
//! let findings = hostshield_core::monitor::recent_findings(100);
//! telemetry::export_findings(&findings, &path, ExportFormat::Csv)?;
//! ```

pub mod stats;
pub mod exporter;

// Re-export main types and functions
pub use stats::{
    global,
    report,
    set_threat_threshold,
    snapshot,
    EngineStats,
    StatsSnapshot,
};

pub use exporter::{export_findings, read_findings, ExportFormat};
