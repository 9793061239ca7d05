use std::sync::Arc;

use super::detectors::{BehaviorMonitor, DEFAULT_MALICIOUS_PORTS};
use super::types::{Detector, SecurityEvent, Severity, SyscallKind};
use crate::telemetry::stats::EngineStats;

/// Epoch milliseconds base so the gap tracker's zero slot never matches
const TS: u64 = 1_700_000_000_000;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_suspicious_file_write() {
    let monitor = BehaviorMonitor::new();

    monitor.submit(SecurityEvent::file_open(42, TS, "/opt/dropper.sh", true));
    assert_eq!(monitor.detector_hits(Detector::SuspiciousFileWrite), 1);

    // Read access and unwatched suffixes stay silent
    monitor.submit(SecurityEvent::file_open(42, TS, "/opt/dropper.sh", false));
    monitor.submit(SecurityEvent::file_open(42, TS, "/opt/notes.txt", true));
    assert_eq!(monitor.detector_hits(Detector::SuspiciousFileWrite), 1);

    let findings = monitor.recent_findings(1);
    assert_eq!(findings[0].entity_id, 42);
    assert_eq!(findings[0].severity, Severity::Medium);
}

#[test]
fn test_critical_file_tamper_inode_bound() {
    let monitor = BehaviorMonitor::new();

    monitor.submit(SecurityEvent::file_permission(7, TS, 999, true));
    assert_eq!(monitor.detector_hits(Detector::CriticalFileTamper), 1);

    monitor.submit(SecurityEvent::file_permission(7, TS, 1000, true));
    monitor.submit(SecurityEvent::file_permission(7, TS, 999, false));
    assert_eq!(monitor.detector_hits(Detector::CriticalFileTamper), 1);
}

#[test]
fn test_suspicious_exec_needs_tmp_and_suffix() {
    let monitor = BehaviorMonitor::new();

    monitor.submit(SecurityEvent::process_exec(9, TS, "/tmp/payload.sh"));
    assert_eq!(monitor.detector_hits(Detector::SuspiciousExec), 1);

    // "tmp" anywhere in the path counts, matching the interception probe
    monitor.submit(SecurityEvent::process_exec(9, TS, "/var/tmpdir/run.bin"));
    assert_eq!(monitor.detector_hits(Detector::SuspiciousExec), 2);

    monitor.submit(SecurityEvent::process_exec(9, TS, "/tmp/readme.txt"));
    monitor.submit(SecurityEvent::process_exec(9, TS, "/usr/local/bin/tool.sh"));
    assert_eq!(monitor.detector_hits(Detector::SuspiciousExec), 2);
}

#[test]
fn test_rapid_connections_share_one_window() {
    let monitor = BehaviorMonitor::new();

    // First connection has no predecessor
    monitor.submit(SecurityEvent::socket_connect(1, TS, 40000, 443, 10));
    assert_eq!(monitor.detector_hits(Detector::RapidConnections), 0);

    // 50ms later, from a different entity: the window is global
    monitor.submit(SecurityEvent::socket_connect(2, TS + 50, 40000, 443, 10));
    assert_eq!(monitor.detector_hits(Detector::RapidConnections), 1);

    monitor.submit(SecurityEvent::socket_connect(1, TS + 550, 40000, 443, 10));
    assert_eq!(monitor.detector_hits(Detector::RapidConnections), 1);
}

#[test]
fn test_flagged_port_matches_source_or_destination() {
    let monitor = BehaviorMonitor::new();

    monitor.submit(SecurityEvent::socket_connect(5, TS, 40000, 4444, 10));
    assert_eq!(monitor.detector_hits(Detector::MaliciousPort), 1);

    monitor.submit(SecurityEvent::socket_connect(5, TS + 10_000, 31337, 8080, 10));
    assert_eq!(monitor.detector_hits(Detector::MaliciousPort), 2);

    monitor.submit(SecurityEvent::socket_connect(5, TS + 20_000, 40000, 8080, 10));
    assert_eq!(monitor.detector_hits(Detector::MaliciousPort), 2);
}

#[test]
fn test_every_default_port_fires() {
    let monitor = BehaviorMonitor::new();

    for (i, port) in DEFAULT_MALICIOUS_PORTS.iter().enumerate() {
        let ts = TS + 10_000 * i as u64;
        monitor.submit(SecurityEvent::socket_connect(5, ts, 40000, *port, 10));
    }
    assert_eq!(
        monitor.detector_hits(Detector::MaliciousPort),
        DEFAULT_MALICIOUS_PORTS.len() as u64
    );
}

#[test]
fn test_custom_flagged_ports_replace_defaults() {
    let monitor = BehaviorMonitor::new().with_flagged_ports(&[8443]);

    monitor.submit(SecurityEvent::socket_connect(3, TS, 40000, 8443, 10));
    monitor.submit(SecurityEvent::socket_connect(3, TS + 10_000, 40000, 4444, 10));
    assert_eq!(monitor.detector_hits(Detector::MaliciousPort), 1);
}

#[test]
fn test_unusual_port_pairing_bounds() {
    let monitor = BehaviorMonitor::new();

    monitor.submit(SecurityEvent::socket_connect(6, TS, 49153, 1023, 10));
    assert_eq!(monitor.detector_hits(Detector::UnusualPortPair), 1);

    // Both bounds are strict
    monitor.submit(SecurityEvent::socket_connect(6, TS + 10_000, 49152, 80, 10));
    monitor.submit(SecurityEvent::socket_connect(6, TS + 20_000, 50000, 1024, 10));
    assert_eq!(monitor.detector_hits(Detector::UnusualPortPair), 1);
}

#[test]
fn test_port_detectors_fire_independently() {
    let monitor = BehaviorMonitor::new();

    // 54321 is both flagged and ephemeral, 22 is privileged
    monitor.submit(SecurityEvent::socket_connect(8, TS, 54321, 22, 10));

    assert_eq!(monitor.detector_hits(Detector::MaliciousPort), 1);
    assert_eq!(monitor.detector_hits(Detector::UnusualPortPair), 1);
    assert_eq!(monitor.stats().events_logged(), 1);
    assert_eq!(monitor.stats().threats_detected(), 2);
}

#[test]
fn test_data_exfiltration_payload_bound() {
    let monitor = BehaviorMonitor::new();

    monitor.submit(SecurityEvent::socket_connect(4, TS, 40000, 443, 65001));
    assert_eq!(monitor.detector_hits(Detector::DataExfiltration), 1);

    monitor.submit(SecurityEvent::socket_connect(4, TS + 10_000, 40000, 443, 65000));
    assert_eq!(monitor.detector_hits(Detector::DataExfiltration), 1);
}

#[test]
fn test_process_injection_flag_combination() {
    let monitor = BehaviorMonitor::new();

    monitor.submit(SecurityEvent::task_create(11, TS, true, true, false));
    assert_eq!(monitor.detector_hits(Detector::ProcessInjection), 1);
    assert_eq!(monitor.recent_findings(1)[0].severity, Severity::Critical);

    // A shared thread group makes it an ordinary thread spawn
    monitor.submit(SecurityEvent::task_create(11, TS, true, true, true));
    monitor.submit(SecurityEvent::task_create(11, TS, false, true, false));
    monitor.submit(SecurityEvent::task_create(11, TS, true, false, false));
    assert_eq!(monitor.detector_hits(Detector::ProcessInjection), 1);
}

#[test]
fn test_open_volume_fires_on_every_event_past_threshold() {
    init_logs();
    let monitor = BehaviorMonitor::new();

    for _ in 0..1000 {
        monitor.submit(SecurityEvent::syscall(7, TS, SyscallKind::Open));
    }
    assert_eq!(monitor.detector_hits(Detector::SyscallOpenVolume), 0);

    for expected in 1..=5u64 {
        monitor.submit(SecurityEvent::syscall(7, TS, SyscallKind::Open));
        assert_eq!(monitor.detector_hits(Detector::SyscallOpenVolume), expected);
    }

    assert_eq!(monitor.syscall_count(SyscallKind::Open), 1005);
    // The generic burst counter saw the same 1005 events
    assert_eq!(monitor.detector_hits(Detector::CallBurst), 9);
}

#[test]
fn test_socket_volume_threshold() {
    let monitor = BehaviorMonitor::new();

    for _ in 0..100 {
        monitor.submit(SecurityEvent::syscall(7, TS, SyscallKind::Socket));
    }
    assert_eq!(monitor.detector_hits(Detector::SyscallSocketVolume), 0);

    monitor.submit(SecurityEvent::syscall(7, TS, SyscallKind::Socket));
    assert_eq!(monitor.detector_hits(Detector::SyscallSocketVolume), 1);
    assert_eq!(monitor.syscall_count(SyscallKind::Socket), 101);
}

#[test]
fn test_ptrace_fires_unconditionally() {
    let monitor = BehaviorMonitor::new();

    for _ in 0..3 {
        monitor.submit(SecurityEvent::syscall(13, TS, SyscallKind::Ptrace));
    }
    assert_eq!(monitor.detector_hits(Detector::PtraceUsage), 3);

    let findings = monitor.recent_findings(3);
    assert!(findings
        .iter()
        .all(|f| f.description == "ptrace() call detected"));
}

#[test]
fn test_call_burst_resets_after_firing() {
    init_logs();
    let monitor = BehaviorMonitor::new();

    let mut fired_at = Vec::new();
    for i in 1..=250u64 {
        monitor.submit(SecurityEvent::syscall(3, TS, SyscallKind::Write));
        if monitor.detector_hits(Detector::CallBurst) > fired_at.len() as u64 {
            fired_at.push(i);
        }
    }

    assert_eq!(fired_at, vec![101, 202]);
    assert_eq!(monitor.stats().events_logged(), 250);
    assert_eq!(monitor.stats().threats_detected(), 2);
}

#[test]
fn test_write_and_execve_counted_but_silent() {
    let monitor = BehaviorMonitor::new();

    for _ in 0..5 {
        monitor.submit(SecurityEvent::syscall(2, TS, SyscallKind::Write));
        monitor.submit(SecurityEvent::syscall(2, TS, SyscallKind::Execve));
    }

    assert_eq!(monitor.syscall_count(SyscallKind::Write), 5);
    assert_eq!(monitor.syscall_count(SyscallKind::Execve), 5);
    assert_eq!(monitor.stats().threats_detected(), 0);
}

#[test]
fn test_statistics_feed_detection_rate() {
    let monitor = BehaviorMonitor::new();

    for _ in 0..3 {
        monitor.submit(SecurityEvent::file_open(1, TS, "/etc/passwd", false));
    }
    monitor.submit(SecurityEvent::syscall(1, TS, SyscallKind::Ptrace));

    assert_eq!(monitor.stats().events_logged(), 4);
    assert_eq!(monitor.stats().threats_detected(), 1);
    assert!((monitor.stats().detection_rate() - 25.0).abs() < f64::EPSILON);
}

#[test]
fn test_shared_stats_handle() {
    let stats = Arc::new(EngineStats::new());
    let monitor = BehaviorMonitor::with_stats(stats.clone());

    monitor.submit(SecurityEvent::syscall(1, TS, SyscallKind::Ptrace));

    assert_eq!(stats.events_logged(), 1);
    assert_eq!(stats.threats_detected(), 1);
}

#[test]
fn test_submit_json_round_trip_and_malformed() {
    let monitor = BehaviorMonitor::new();

    let event = SecurityEvent::socket_connect(9, TS, 40000, 4444, 10);
    let line = serde_json::to_string(&event).unwrap();
    monitor.submit_json(&line);

    assert_eq!(monitor.stats().events_logged(), 1);
    assert_eq!(monitor.detector_hits(Detector::MaliciousPort), 1);

    // Malformed and unknown-kind lines are dropped without counting
    monitor.submit_json("{not json");
    monitor.submit_json(r#"{"entity_id":1,"timestamp_ms":5,"kind":"warp_drive"}"#);
    monitor.submit_json(r#"{"entity_id":1,"kind":"process_exec"}"#);
    assert_eq!(monitor.stats().events_logged(), 1);
}

#[test]
fn test_recent_findings_newest_first() {
    let monitor = BehaviorMonitor::new();

    monitor.submit(SecurityEvent::syscall(1, TS, SyscallKind::Ptrace));
    monitor.submit(SecurityEvent::socket_connect(2, TS + 10_000, 40000, 443, 70000));

    let findings = monitor.recent_findings(10);
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].detector, Detector::DataExfiltration);
    assert_eq!(findings[1].detector, Detector::PtraceUsage);
}

#[test]
fn test_findings_buffer_is_bounded() {
    let monitor = BehaviorMonitor::new();

    for _ in 0..1005 {
        monitor.submit(SecurityEvent::syscall(1, TS, SyscallKind::Ptrace));
    }

    assert_eq!(monitor.detector_hits(Detector::PtraceUsage), 1005);
    assert_eq!(monitor.monitor_stats().findings_buffered, 1000);
    assert_eq!(monitor.recent_findings(2000).len(), 1000);
}

#[test]
fn test_monitor_stats_serializes_by_detector_name() {
    let monitor = BehaviorMonitor::new();
    monitor.submit(SecurityEvent::syscall(1, TS, SyscallKind::Ptrace));

    let json = serde_json::to_string(&monitor.monitor_stats()).unwrap();
    assert!(json.contains(r#""ptrace_usage":1"#));
    assert!(json.contains(r#""findings_buffered":1"#));
}
