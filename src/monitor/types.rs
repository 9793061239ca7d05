//! Behavioral Event Types
//!
//! Typed events pushed in by interception adapters, and the findings the
//! detectors produce. Events carry only host-independent attributes; the
//! adapter translating raw interception data owns any platform detail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// SYSCALL KINDS
// ============================================================================

/// Probed syscalls. Write and execve are counted but trigger nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyscallKind {
    Execve,
    Open,
    Write,
    Socket,
    Ptrace,
}

impl SyscallKind {
    pub const ALL: [SyscallKind; 5] = [
        SyscallKind::Execve,
        SyscallKind::Open,
        SyscallKind::Write,
        SyscallKind::Socket,
        SyscallKind::Ptrace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyscallKind::Execve => "execve",
            SyscallKind::Open => "open",
            SyscallKind::Write => "write",
            SyscallKind::Socket => "socket",
            SyscallKind::Ptrace => "ptrace",
        }
    }

    /// Slot in the per-syscall counter array
    pub fn index(&self) -> usize {
        match self {
            SyscallKind::Execve => 0,
            SyscallKind::Open => 1,
            SyscallKind::Write => 2,
            SyscallKind::Socket => 3,
            SyscallKind::Ptrace => 4,
        }
    }
}

// ============================================================================
// EVENT MODEL
// ============================================================================

/// Event categories, one per interception point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    FileOpen,
    FilePermission,
    ProcessExec,
    SocketConnect,
    TaskCreate,
    SyscallInvoke,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FileOpen => "file_open",
            EventKind::FilePermission => "file_permission",
            EventKind::ProcessExec => "process_exec",
            EventKind::SocketConnect => "socket_connect",
            EventKind::TaskCreate => "task_create",
            EventKind::SyscallInvoke => "syscall_invoke",
        }
    }
}

/// Per-kind event attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventDetail {
    FileOpen {
        path: String,
        /// Write access requested
        write: bool,
    },
    FilePermission {
        inode: u64,
        /// Permission check includes the write bit
        write_mask: bool,
    },
    ProcessExec {
        path: String,
    },
    SocketConnect {
        src_port: u16,
        dst_port: u16,
        /// Outbound payload size in bytes
        payload_size: u64,
    },
    TaskCreate {
        shares_files: bool,
        shares_memory: bool,
        shares_thread: bool,
    },
    SyscallInvoke {
        syscall: SyscallKind,
    },
}

/// One observed operation, produced by an interception adapter
///
/// Events are immutable; the monitor consumes each exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Originating entity (process id or equivalent)
    pub entity_id: u32,
    /// Milliseconds since the epoch, as seen by the adapter
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub detail: EventDetail,
}

impl SecurityEvent {
    pub fn kind(&self) -> EventKind {
        match self.detail {
            EventDetail::FileOpen { .. } => EventKind::FileOpen,
            EventDetail::FilePermission { .. } => EventKind::FilePermission,
            EventDetail::ProcessExec { .. } => EventKind::ProcessExec,
            EventDetail::SocketConnect { .. } => EventKind::SocketConnect,
            EventDetail::TaskCreate { .. } => EventKind::TaskCreate,
            EventDetail::SyscallInvoke { .. } => EventKind::SyscallInvoke,
        }
    }

    // Convenience constructors, one per interception point

    pub fn file_open(entity_id: u32, timestamp_ms: u64, path: &str, write: bool) -> Self {
        Self {
            entity_id,
            timestamp_ms,
            detail: EventDetail::FileOpen {
                path: path.to_string(),
                write,
            },
        }
    }

    pub fn file_permission(entity_id: u32, timestamp_ms: u64, inode: u64, write_mask: bool) -> Self {
        Self {
            entity_id,
            timestamp_ms,
            detail: EventDetail::FilePermission { inode, write_mask },
        }
    }

    pub fn process_exec(entity_id: u32, timestamp_ms: u64, path: &str) -> Self {
        Self {
            entity_id,
            timestamp_ms,
            detail: EventDetail::ProcessExec {
                path: path.to_string(),
            },
        }
    }

    pub fn socket_connect(
        entity_id: u32,
        timestamp_ms: u64,
        src_port: u16,
        dst_port: u16,
        payload_size: u64,
    ) -> Self {
        Self {
            entity_id,
            timestamp_ms,
            detail: EventDetail::SocketConnect {
                src_port,
                dst_port,
                payload_size,
            },
        }
    }

    pub fn task_create(
        entity_id: u32,
        timestamp_ms: u64,
        shares_files: bool,
        shares_memory: bool,
        shares_thread: bool,
    ) -> Self {
        Self {
            entity_id,
            timestamp_ms,
            detail: EventDetail::TaskCreate {
                shares_files,
                shares_memory,
                shares_thread,
            },
        }
    }

    pub fn syscall(entity_id: u32, timestamp_ms: u64, syscall: SyscallKind) -> Self {
        Self {
            entity_id,
            timestamp_ms,
            detail: EventDetail::SyscallInvoke { syscall },
        }
    }
}

// ============================================================================
// DETECTORS
// ============================================================================

/// The twelve behavioral detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detector {
    SuspiciousFileWrite,
    CriticalFileTamper,
    SuspiciousExec,
    RapidConnections,
    MaliciousPort,
    UnusualPortPair,
    DataExfiltration,
    ProcessInjection,
    SyscallOpenVolume,
    SyscallSocketVolume,
    PtraceUsage,
    CallBurst,
}

impl Detector {
    pub const ALL: [Detector; 12] = [
        Detector::SuspiciousFileWrite,
        Detector::CriticalFileTamper,
        Detector::SuspiciousExec,
        Detector::RapidConnections,
        Detector::MaliciousPort,
        Detector::UnusualPortPair,
        Detector::DataExfiltration,
        Detector::ProcessInjection,
        Detector::SyscallOpenVolume,
        Detector::SyscallSocketVolume,
        Detector::PtraceUsage,
        Detector::CallBurst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Detector::SuspiciousFileWrite => "suspicious_file_write",
            Detector::CriticalFileTamper => "critical_file_tamper",
            Detector::SuspiciousExec => "suspicious_exec",
            Detector::RapidConnections => "rapid_connections",
            Detector::MaliciousPort => "malicious_port",
            Detector::UnusualPortPair => "unusual_port_pair",
            Detector::DataExfiltration => "data_exfiltration",
            Detector::ProcessInjection => "process_injection",
            Detector::SyscallOpenVolume => "syscall_open_volume",
            Detector::SyscallSocketVolume => "syscall_socket_volume",
            Detector::PtraceUsage => "ptrace_usage",
            Detector::CallBurst => "call_burst",
        }
    }

    /// Slot in the per-detector hit counter array
    pub fn index(&self) -> usize {
        match self {
            Detector::SuspiciousFileWrite => 0,
            Detector::CriticalFileTamper => 1,
            Detector::SuspiciousExec => 2,
            Detector::RapidConnections => 3,
            Detector::MaliciousPort => 4,
            Detector::UnusualPortPair => 5,
            Detector::DataExfiltration => 6,
            Detector::ProcessInjection => 7,
            Detector::SyscallOpenVolume => 8,
            Detector::SyscallSocketVolume => 9,
            Detector::PtraceUsage => 10,
            Detector::CallBurst => 11,
        }
    }

    /// Fixed severity per detector
    pub fn severity(&self) -> Severity {
        match self {
            Detector::SyscallOpenVolume | Detector::CallBurst => Severity::Low,
            Detector::SuspiciousFileWrite
            | Detector::RapidConnections
            | Detector::UnusualPortPair
            | Detector::SyscallSocketVolume
            | Detector::PtraceUsage => Severity::Medium,
            Detector::CriticalFileTamper
            | Detector::SuspiciousExec
            | Detector::MaliciousPort
            | Detector::DataExfiltration => Severity::High,
            Detector::ProcessInjection => Severity::Critical,
        }
    }
}

impl std::fmt::Display for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// FINDINGS
// ============================================================================

/// Finding severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// One detector firing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Unique finding ID
    pub id: Uuid,
    /// When the monitor recorded the firing (UTC)
    pub timestamp: DateTime<Utc>,
    /// Entity whose event fired the detector
    pub entity_id: u32,
    pub detector: Detector,
    pub severity: Severity,
    /// Human-readable description
    pub description: String,
}

impl Finding {
    pub fn new(entity_id: u32, detector: Detector, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            entity_id,
            detector,
            severity: detector.severity(),
            description,
        }
    }

    /// Convert to JSONL line (for append-only export)
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_mapping() {
        let event = SecurityEvent::file_open(1, 0, "/tmp/a.sh", true);
        assert_eq!(event.kind(), EventKind::FileOpen);
        assert_eq!(event.kind().as_str(), "file_open");

        let event = SecurityEvent::syscall(1, 0, SyscallKind::Ptrace);
        assert_eq!(event.kind(), EventKind::SyscallInvoke);
    }

    #[test]
    fn test_detector_indices_are_distinct() {
        let mut seen = [false; 12];
        for detector in Detector::ALL {
            let idx = detector.index();
            assert!(!seen[idx], "duplicate index for {}", detector);
            seen[idx] = true;
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_event_json_round_trip() {
        let event = SecurityEvent::socket_connect(7, 1_700_000_000_000, 50000, 4444, 128);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"socket_connect\""));

        let back: SecurityEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_finding_carries_detector_severity() {
        let finding = Finding::new(9, Detector::ProcessInjection, "clone flags".to_string());
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.detector.as_str(), "process_injection");
    }

    #[test]
    fn test_finding_serializes_snake_case() {
        let finding = Finding::new(3, Detector::CriticalFileTamper, "inode 42".to_string());
        let json = finding.to_jsonl();
        assert!(json.contains("\"detector\":\"critical_file_tamper\""));
        assert!(json.contains("\"severity\":\"high\""));

        let back: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(back.severity, Severity::High);
    }
}
