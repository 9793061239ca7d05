//! Behavioral Detection Engine
//!
//! Mục đích: Chạy 12 detectors độc lập trên stream của `SecurityEvent`
//!
//! Mỗi detector quan sát một loại event:
//! - File detectors: suspicious write, critical-file tamper
//! - Process detectors: exec from tmp, injection-style cloning
//! - Network detectors: rapid connections, flagged ports, port pairing, exfiltration
//! - Syscall detectors: open/socket volume, ptrace, generic call burst
//!
//! Detection là observe-only: không detector nào chặn operation gốc.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::counters::{EdgeTriggeredCounter, GlobalGapTracker, MonotonicCounter};
use super::types::{Detector, EventDetail, Finding, SecurityEvent, SyscallKind};
use crate::telemetry::stats::{self, EngineStats};

// ============================================================================
// CONSTANTS
// ============================================================================

/// File suffixes watched by the suspicious-write detector
const WATCHED_FILE_SUFFIXES: &[&str] = &[".sh", ".bin", ".ko", ".so"];

/// Executable suffixes flagged when the path goes through a tmp directory
const WATCHED_EXEC_SUFFIXES: &[&str] = &[".sh", ".bin"];

/// Inodes below this boundary are treated as critical system files
const CRITICAL_INODE_BOUND: u64 = 1000;

/// Default flagged ports, matched against source or destination
pub const DEFAULT_MALICIOUS_PORTS: &[u16] = &[
    4444,  // Metasploit default
    5555,  // Common C2
    6666,
    7777,
    8888,
    9999,  // Common backdoor
    31337, // Elite/leet
    31338,
    12345, // NetBus
    54321,
];

/// Source ports above this are ephemeral for the pairing detector
const EPHEMERAL_PORT_FLOOR: u16 = 49152;

/// Destination ports below this are privileged for the pairing detector
const PRIVILEGED_PORT_BOUND: u16 = 1024;

/// Outbound payloads larger than this count as exfiltration (bytes)
const EXFIL_PAYLOAD_BOUND: u64 = 65000;

/// Two connections closer than this are rapid (ms), shared across all entities
const RAPID_CONNECT_WINDOW_MS: u64 = 100;

/// Open-syscall volume threshold (monotonic)
const OPEN_VOLUME_THRESHOLD: u64 = 1000;

/// Socket-syscall volume threshold (monotonic)
const SOCKET_VOLUME_THRESHOLD: u64 = 100;

/// Generic burst threshold over all ingested events (edge-triggered)
const CALL_BURST_THRESHOLD: u64 = 100;

/// Most recent findings kept in memory
const FINDINGS_BUFFER_CAP: usize = 1000;

// ============================================================================
// STATE
// ============================================================================

static MONITOR: Lazy<BehaviorMonitor> =
    Lazy::new(|| BehaviorMonitor::with_stats(stats::global()));

// ============================================================================
// BEHAVIOR MONITOR
// ============================================================================

pub struct BehaviorMonitor {
    stats: Arc<EngineStats>,
    flagged_ports: Vec<u16>,
    open_calls: MonotonicCounter,
    socket_calls: MonotonicCounter,
    call_burst: EdgeTriggeredCounter,
    connection_gap: GlobalGapTracker,
    syscall_counts: [AtomicU64; 5],
    detector_hits: [AtomicU64; 12],
    findings: Mutex<VecDeque<Finding>>,
}

impl BehaviorMonitor {
    /// Standalone monitor with its own statistics counters
    pub fn new() -> Self {
        Self::with_stats(Arc::new(EngineStats::new()))
    }

    /// Monitor reporting into a shared statistics aggregator
    pub fn with_stats(stats: Arc<EngineStats>) -> Self {
        Self {
            stats,
            flagged_ports: DEFAULT_MALICIOUS_PORTS.to_vec(),
            open_calls: MonotonicCounter::new(OPEN_VOLUME_THRESHOLD),
            socket_calls: MonotonicCounter::new(SOCKET_VOLUME_THRESHOLD),
            call_burst: EdgeTriggeredCounter::new(CALL_BURST_THRESHOLD),
            connection_gap: GlobalGapTracker::new(RAPID_CONNECT_WINDOW_MS),
            syscall_counts: Default::default(),
            detector_hits: Default::default(),
            findings: Mutex::new(VecDeque::new()),
        }
    }

    /// Replace the flagged-port set
    pub fn with_flagged_ports(mut self, ports: &[u16]) -> Self {
        self.flagged_ports = ports.to_vec();
        self
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Run every applicable detector against one event
    ///
    /// Counts the event first, then dispatches by kind. Detectors on the
    /// same kind are independent: one socket event can fire several.
    pub fn submit(&self, event: SecurityEvent) {
        self.stats.record_event();

        match &event.detail {
            EventDetail::FileOpen { path, write } => {
                if *write && has_suffix(path, WATCHED_FILE_SUFFIXES) {
                    self.fire(
                        Detector::SuspiciousFileWrite,
                        event.entity_id,
                        format!("Suspicious write to {}", path),
                    );
                }
            }
            EventDetail::FilePermission { inode, write_mask } => {
                if *write_mask && *inode < CRITICAL_INODE_BOUND {
                    self.fire(
                        Detector::CriticalFileTamper,
                        event.entity_id,
                        format!("Attempt to modify critical file (inode {})", inode),
                    );
                }
            }
            EventDetail::ProcessExec { path } => {
                if path.contains("tmp") && has_suffix(path, WATCHED_EXEC_SUFFIXES) {
                    self.fire(
                        Detector::SuspiciousExec,
                        event.entity_id,
                        format!("Suspicious executable from tmp path: {}", path),
                    );
                }
            }
            EventDetail::SocketConnect {
                src_port,
                dst_port,
                payload_size,
            } => {
                if self.connection_gap.record(event.timestamp_ms) {
                    self.fire(
                        Detector::RapidConnections,
                        event.entity_id,
                        "Rapid network connections detected".to_string(),
                    );
                }
                if self.is_flagged_port(*src_port) || self.is_flagged_port(*dst_port) {
                    self.fire(
                        Detector::MaliciousPort,
                        event.entity_id,
                        format!("Suspicious C2 port pattern: {} -> {}", src_port, dst_port),
                    );
                }
                if *src_port > EPHEMERAL_PORT_FLOOR && *dst_port < PRIVILEGED_PORT_BOUND {
                    self.fire(
                        Detector::UnusualPortPair,
                        event.entity_id,
                        format!("Unusual port pairing: {} -> {}", src_port, dst_port),
                    );
                }
                if *payload_size > EXFIL_PAYLOAD_BOUND {
                    self.fire(
                        Detector::DataExfiltration,
                        event.entity_id,
                        format!("Data exfiltration attempt: {} byte payload", payload_size),
                    );
                }
            }
            EventDetail::TaskCreate {
                shares_files,
                shares_memory,
                shares_thread,
            } => {
                if *shares_files && *shares_memory && !*shares_thread {
                    self.fire(
                        Detector::ProcessInjection,
                        event.entity_id,
                        "Suspicious process cloning detected".to_string(),
                    );
                }
            }
            EventDetail::SyscallInvoke { syscall } => {
                self.syscall_counts[syscall.index()].fetch_add(1, Ordering::Relaxed);
                match syscall {
                    SyscallKind::Open => {
                        if self.open_calls.record() {
                            self.fire(
                                Detector::SyscallOpenVolume,
                                event.entity_id,
                                "Excessive file open calls detected".to_string(),
                            );
                        }
                    }
                    SyscallKind::Socket => {
                        if self.socket_calls.record() {
                            self.fire(
                                Detector::SyscallSocketVolume,
                                event.entity_id,
                                "Suspicious socket creation pattern".to_string(),
                            );
                        }
                    }
                    SyscallKind::Ptrace => {
                        self.fire(
                            Detector::PtraceUsage,
                            event.entity_id,
                            "ptrace() call detected".to_string(),
                        );
                    }
                    SyscallKind::Execve | SyscallKind::Write => {}
                }
            }
        }

        // Every ingested event counts toward the generic burst window
        if self.call_burst.record() {
            self.fire(
                Detector::CallBurst,
                event.entity_id,
                "High system call frequency".to_string(),
            );
        }
    }

    /// Parse one JSON-encoded event and submit it
    ///
    /// Malformed lines are dropped without touching `events_logged`.
    pub fn submit_json(&self, line: &str) {
        match serde_json::from_str::<SecurityEvent>(line) {
            Ok(event) => self.submit(event),
            Err(e) => {
                log::debug!("Dropped malformed event: {}", e);
            }
        }
    }

    /// Newest-first slice of the findings buffer
    pub fn recent_findings(&self, limit: usize) -> Vec<Finding> {
        self.findings
            .lock()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Total firings of one detector
    pub fn detector_hits(&self, detector: Detector) -> u64 {
        self.detector_hits[detector.index()].load(Ordering::Relaxed)
    }

    /// Total invocations of one syscall kind
    pub fn syscall_count(&self, syscall: SyscallKind) -> u64 {
        self.syscall_counts[syscall.index()].load(Ordering::Relaxed)
    }

    pub fn monitor_stats(&self) -> MonitorStats {
        let detector_hits = Detector::ALL
            .iter()
            .map(|d| (d.as_str(), self.detector_hits(*d)))
            .collect();
        let syscall_counts = SyscallKind::ALL
            .iter()
            .map(|s| (s.as_str(), self.syscall_count(*s)))
            .collect();

        MonitorStats {
            detector_hits,
            syscall_counts,
            findings_buffered: self.findings.lock().len(),
        }
    }

    fn is_flagged_port(&self, port: u16) -> bool {
        self.flagged_ports.contains(&port)
    }

    fn fire(&self, detector: Detector, entity_id: u32, description: String) {
        self.stats.record_threat();
        self.detector_hits[detector.index()].fetch_add(1, Ordering::Relaxed);

        let finding = Finding::new(entity_id, detector, description);
        log::warn!(
            "[{}] entity {}: {}",
            detector,
            entity_id,
            finding.description
        );

        let mut findings = self.findings.lock();
        if findings.len() == FINDINGS_BUFFER_CAP {
            findings.pop_front();
        }
        findings.push_back(finding);
    }
}

impl Default for BehaviorMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn has_suffix(path: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| path.ends_with(s))
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Submit an event to the shared monitor
pub fn submit(event: SecurityEvent) {
    MONITOR.submit(event);
}

/// Submit one JSON-encoded event to the shared monitor
pub fn submit_json(line: &str) {
    MONITOR.submit_json(line);
}

/// Newest-first findings from the shared monitor
pub fn recent_findings(limit: usize) -> Vec<Finding> {
    MONITOR.recent_findings(limit)
}

/// Counter view of the shared monitor
pub fn monitor_stats() -> MonitorStats {
    MONITOR.monitor_stats()
}

// ============================================================================
// STATISTICS
// ============================================================================

#[derive(Debug, Clone, serde::Serialize)]
pub struct MonitorStats {
    pub detector_hits: BTreeMap<&'static str, u64>,
    pub syscall_counts: BTreeMap<&'static str, u64>,
    pub findings_buffered: usize,
}

// ============================================================================
// TESTS
// ============================================================================
