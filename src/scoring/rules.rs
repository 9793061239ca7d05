//! Scoring Rules & Thresholds
//!
//! Định nghĩa weights, cutoff và reputation tables cho scoring.
//! KHÔNG chứa logic classify - chỉ constants và config.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// ============================================================================
// WEIGHTS & CUTOFFS (Constants - không đổi lúc runtime)
// ============================================================================

/// Weight of the structural feature average (80%)
pub const STRUCTURAL_WEIGHT: f32 = 0.8;

/// Weight of the context keyword score (20%)
pub const CONTEXT_WEIGHT: f32 = 0.2;

/// At or above this confidence = threat
///
/// Distinct from the Behavioral Monitor's percentage reporting threshold.
pub const THREAT_CONFIDENCE_CUTOFF: f32 = 0.7;

/// Sub-scores above this contribute a reason string
pub const REASON_TRIGGER: f32 = 0.5;

/// Each context keyword occurrence adds this much
pub const KEYWORD_INCREMENT: f32 = 0.15;

/// Upper bound on the context score
pub const CONTEXT_SCORE_CAP: f32 = 0.5;

/// Keywords counted in surrounding context text
pub const CONTEXT_KEYWORDS: [&str; 5] = ["verify", "confirm", "update", "validate", "secure"];

// ============================================================================
// DOMAIN REPUTATION TABLES
// ============================================================================

/// Reputation tables consulted by the domain extractor
///
/// `Default` seeds the built-in tables; callers can supply their own
/// through `classify_with_tables`. All entries are stored lowercased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainTables {
    /// Exact-match known-bad authorities with per-entry weight
    pub domains: HashMap<String, f32>,
    /// Flagged TLDs, matched anywhere inside the authority
    pub flagged_tlds: Vec<String>,
    /// Brand token -> full brand names for the lookalike check
    pub lookalikes: HashMap<String, Vec<String>>,
}

impl Default for DomainTables {
    fn default() -> Self {
        let mut tables = Self::empty();

        tables.add_domain("paypa1.com", 0.9);
        tables.add_domain("amaz0n.com", 0.9);
        tables.add_domain("go0gle.com", 0.9);
        tables.add_domain("bank-verify.com", 0.95);
        tables.add_domain("account-confirm.com", 0.95);
        tables.add_domain("secure-login.com", 0.9);

        for tld in [".tk", ".ml", ".ga", ".cf", ".xyz", ".top"] {
            tables.add_flagged_tld(tld);
        }

        tables.add_lookalike("paypa", "paypal");
        tables.add_lookalike("amaz", "amazon");
        tables.add_lookalike("goog", "google");
        tables.add_lookalike("face", "facebook");

        tables
    }
}

impl DomainTables {
    /// Tables with nothing flagged
    pub fn empty() -> Self {
        Self {
            domains: HashMap::new(),
            flagged_tlds: Vec::new(),
            lookalikes: HashMap::new(),
        }
    }

    /// Flag an exact authority with a weight (clamped to [0, 1])
    pub fn add_domain(&mut self, domain: &str, weight: f32) {
        self.domains
            .insert(domain.to_lowercase(), weight.clamp(0.0, 1.0));
    }

    /// Flag a TLD fragment
    pub fn add_flagged_tld(&mut self, tld: &str) {
        self.flagged_tlds.push(tld.to_lowercase());
    }

    /// Register a brand token for the lookalike check
    pub fn add_lookalike(&mut self, token: &str, brand: &str) {
        self.lookalikes
            .entry(token.to_lowercase())
            .or_default()
            .push(brand.to_lowercase());
    }
}

static DEFAULT_TABLES: Lazy<DomainTables> = Lazy::new(DomainTables::default);

/// Shared instance of the built-in tables
pub fn default_tables() -> &'static DomainTables {
    &DEFAULT_TABLES
}
