//! Findings Exporter
//!
//! Export detector findings to local files for offline analysis
//! (SIEM ingestion, spreadsheets, ad-hoc scripting).

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::monitor::types::Finding;

// ============================================================================
// EXPORT FORMATS
// ============================================================================

/// Supported export formats
#[derive(Debug, Clone, Copy)]
pub enum ExportFormat {
    /// JSONL (default, one JSON per line)
    Jsonl,
    /// CSV for spreadsheet analysis
    Csv,
    /// Compact JSON array
    JsonArray,
}

// ============================================================================
// EXPORT FUNCTIONS
// ============================================================================

/// Export findings to file, returning the exported count
pub fn export_findings(
    findings: &[Finding],
    destination: &PathBuf,
    format: ExportFormat,
) -> std::io::Result<usize> {
    let mut file = File::create(destination)?;
    let count = findings.len();

    match format {
        ExportFormat::Jsonl => {
            for finding in findings {
                writeln!(file, "{}", finding.to_jsonl())?;
            }
        }
        ExportFormat::JsonArray => {
            let json = serde_json::to_string_pretty(findings)?;
            file.write_all(json.as_bytes())?;
        }
        ExportFormat::Csv => {
            export_csv(&mut file, findings)?;
        }
    }

    Ok(count)
}

/// Export to CSV format
fn export_csv(file: &mut File, findings: &[Finding]) -> std::io::Result<()> {
    // Header
    writeln!(file, "id,timestamp,entity_id,detector,severity,description")?;

    for finding in findings {
        // Escape CSV fields
        let description = finding.description.replace('"', "\"\"");

        writeln!(
            file,
            "{},{},{},{},{},\"{}\"",
            finding.id,
            finding.timestamp.to_rfc3339(),
            finding.entity_id,
            finding.detector.as_str(),
            finding.severity.as_str(),
            description
        )?;
    }

    Ok(())
}

/// Read findings back from a JSONL export
///
/// Lines that fail to parse are skipped.
pub fn read_findings(source: &PathBuf) -> std::io::Result<Vec<Finding>> {
    let file = File::open(source)?;
    let reader = BufReader::new(file);
    let mut findings = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if !line.is_empty() {
            if let Ok(finding) = serde_json::from_str::<Finding>(&line) {
                findings.push(finding);
            }
        }
    }

    Ok(findings)
}

// ============================================================================
// TESTS
// ============================================================================
