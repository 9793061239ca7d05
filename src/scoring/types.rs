//! Scoring Types
//!
//! Core types cho artifact scoring.
//! KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// THREAT LEVEL
// ============================================================================

/// Verdict severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    /// Không có đủ tín hiệu, artifact được coi là an toàn
    Safe,
    /// Confidence đạt cutoff, cần notify
    High,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Safe => "safe",
            ThreatLevel::High => "high",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// FEATURE SCORES
// ============================================================================

/// Sub-scores from the five structural extractors, each in [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureScoreSet {
    pub length: f32,
    pub domain: f32,
    pub special_chars: f32,
    pub ip_address: f32,
    pub subdomains: f32,
}

impl Default for FeatureScoreSet {
    fn default() -> Self {
        Self {
            length: 0.0,
            domain: 0.0,
            special_chars: 0.0,
            ip_address: 0.0,
            subdomains: 0.0,
        }
    }
}

// ============================================================================
// THREAT VERDICT
// ============================================================================

/// Result of evaluating one artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatVerdict {
    pub is_threat: bool,
    /// Blended score in [0, 1]
    pub confidence: f32,
    pub level: ThreatLevel,
    /// Never empty - falls back to a single "legitimate" entry
    pub reasons: Vec<String>,
    /// Truncated digest of the artifact (16 hex chars)
    pub fingerprint: String,
}

impl Default for ThreatVerdict {
    fn default() -> Self {
        Self {
            is_threat: false,
            confidence: 0.0,
            level: ThreatLevel::Safe,
            reasons: vec![],
            fingerprint: String::new(),
        }
    }
}
