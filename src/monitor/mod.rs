//! Behavioral Monitor Module
//!
//! Mục đích: Nhận `SecurityEvent` từ interception adapters và chạy 12
//! detectors độc lập. Mọi firing tạo một `Finding` và đẩy vào Statistics
//! Aggregator. Detection KHÔNG chặn operation - chỉ quan sát.
//!
//! ## Structure
//! - `types`: `SecurityEvent`, `Detector`, `Severity`, `Finding`
//! - `counters`: Counter lifecycle policies (monotonic, edge-triggered, gap)
//! - `detectors`: `BehaviorMonitor` engine + shared-instance API
//!
//! ## Usage
//! ```ignore
//! use hostshield_core::monitor::{self, SecurityEvent, SyscallKind};
//!
//! monitor::submit(SecurityEvent::file_open(1234, now_ms, "/tmp/drop.sh", true));
//! monitor::submit(SecurityEvent::syscall(1234, now_ms, SyscallKind::Ptrace));
//!
//! for finding in monitor::recent_findings(10) {
//!     println!("{}", finding.to_jsonl());
//! }
//! ```

pub mod types;
pub mod counters;
pub mod detectors;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use types::{
    Detector,
    EventDetail,
    EventKind,
    Finding,
    SecurityEvent,
    Severity,
    SyscallKind,
};

pub use counters::{EdgeTriggeredCounter, GlobalGapTracker, MonotonicCounter};

pub use detectors::{
    monitor_stats, recent_findings, submit, submit_json, BehaviorMonitor, MonitorStats,
    DEFAULT_MALICIOUS_PORTS,
};
