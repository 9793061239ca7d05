//! Artifact Evaluator
//!
//! CHỈ chứa logic evaluate - không có types, không có tables.
//! Input: artifact string + optional context text
//! Output: ThreatVerdict

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use super::features;
use super::rules::{
    self, DomainTables, CONTEXT_WEIGHT, REASON_TRIGGER, STRUCTURAL_WEIGHT,
    THREAT_CONFIDENCE_CUTOFF,
};
use super::types::{FeatureScoreSet, ThreatLevel, ThreatVerdict};
use crate::fingerprint::fingerprint;

// ============================================================================
// MAIN CLASSIFICATION FUNCTIONS
// ============================================================================

/// Evaluate one artifact with no surrounding context
pub fn classify(url: &str) -> ThreatVerdict {
    classify_with_context(url, "")
}

/// Evaluate one artifact together with surrounding context text
pub fn classify_with_context(url: &str, context: &str) -> ThreatVerdict {
    classify_with_tables(url, context, rules::default_tables())
}

/// Evaluate against caller-supplied reputation tables
pub fn classify_with_tables(url: &str, context: &str, tables: &DomainTables) -> ThreatVerdict {
    let fp = fingerprint(url);

    // Shape gate - invalid artifacts skip the extractors entirely
    if !features::is_valid_url(url) {
        return ThreatVerdict {
            is_threat: false,
            confidence: 0.0,
            level: ThreatLevel::Safe,
            reasons: vec!["Invalid URL format".to_string()],
            fingerprint: fp,
        };
    }

    let scores = features::extract(url, tables);
    let structural = structural_score(&scores);
    let context_score = features::context_score(context);

    let confidence =
        (structural * STRUCTURAL_WEIGHT + context_score * CONTEXT_WEIGHT).min(1.0);
    let is_threat = confidence >= THREAT_CONFIDENCE_CUTOFF;

    if is_threat {
        log::warn!("Artifact {} flagged at confidence {:.2}", fp, confidence);
    }

    ThreatVerdict {
        is_threat,
        confidence,
        level: if is_threat {
            ThreatLevel::High
        } else {
            ThreatLevel::Safe
        },
        reasons: extract_reasons(&scores),
        fingerprint: fp,
    }
}

/// Equal-weight average of the five structural sub-scores
fn structural_score(scores: &FeatureScoreSet) -> f32 {
    (scores.length + scores.domain + scores.special_chars + scores.ip_address + scores.subdomains)
        / 5.0
}

/// One fixed reason per sub-score past the trigger level, in extractor order
fn extract_reasons(scores: &FeatureScoreSet) -> Vec<String> {
    let mut reasons = Vec::new();

    if scores.length > REASON_TRIGGER {
        reasons.push("Unusually long URL".to_string());
    }
    if scores.domain > REASON_TRIGGER {
        reasons.push("Suspicious domain name".to_string());
    }
    if scores.special_chars > REASON_TRIGGER {
        reasons.push("Suspicious special characters".to_string());
    }
    if scores.ip_address > REASON_TRIGGER {
        reasons.push("Using IP address instead of domain".to_string());
    }
    if scores.subdomains > REASON_TRIGGER {
        reasons.push("Too many subdomains".to_string());
    }

    if reasons.is_empty() {
        reasons.push("URL appears legitimate".to_string());
    }

    reasons
}

// ============================================================================
// BATCH EVALUATION
// ============================================================================

/// Evaluate a batch of artifacts in parallel
///
/// Results come back in input order. Output storage is sized to the input
/// before any worker starts; each worker writes only its own chunk. A panic
/// while evaluating one artifact substitutes a safe-default verdict for that
/// slot and the rest of the batch continues.
pub fn classify_batch(urls: &[String]) -> Vec<ThreatVerdict> {
    let n = urls.len();
    if n == 0 {
        return Vec::new();
    }

    let mut results = vec![ThreatVerdict::default(); n];

    let workers = thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
        .min(n);
    let chunk_size = (n + workers - 1) / workers;

    thread::scope(|scope| {
        for (url_chunk, result_chunk) in
            urls.chunks(chunk_size).zip(results.chunks_mut(chunk_size))
        {
            scope.spawn(move || {
                for (url, slot) in url_chunk.iter().zip(result_chunk.iter_mut()) {
                    *slot = classify_guarded(url);
                }
            });
        }
    });

    results
}

/// classify() behind a panic guard
fn classify_guarded(url: &str) -> ThreatVerdict {
    match panic::catch_unwind(AssertUnwindSafe(|| classify(url))) {
        Ok(verdict) => verdict,
        Err(_) => {
            let fp = fingerprint(url);
            log::error!("Evaluation panicked for artifact {}", fp);
            ThreatVerdict {
                is_threat: false,
                confidence: 0.0,
                level: ThreatLevel::Safe,
                reasons: vec!["Evaluation failed".to_string()],
                fingerprint: fp,
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
