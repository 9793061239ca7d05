//! Scoring Module
//!
//! Đánh giá artifact strings (URLs) để phát hiện phishing.
//! Đây là CORE STEP - nơi quyết định Safe/High cho từng artifact.
//!
//! ## Structure
//! - `types`: Core types (ThreatLevel, FeatureScoreSet, ThreatVerdict)
//! - `rules`: Weights, cutoffs và reputation tables
//! - `features`: Structural extractors + context keyword scorer
//! - `classifier`: Evaluation logic, parallel batch
//!
//! ## Usage
//! ```ignore
//! use hostshield_core::scoring::{classify, classify_with_context};
//!
//! let verdict = classify("http://paypa1.com");
//! if verdict.is_threat {
//!     println!("Flagged: {:?}", verdict.reasons);
//! }
//! ```

pub mod types;
pub mod rules;
pub mod features;
pub mod classifier;

// Re-export main types for convenience
pub use types::{FeatureScoreSet, ThreatLevel, ThreatVerdict};

pub use rules::{
    DomainTables,
    CONTEXT_WEIGHT,
    STRUCTURAL_WEIGHT,
    THREAT_CONFIDENCE_CUTOFF,
};

pub use classifier::{classify, classify_batch, classify_with_context, classify_with_tables};
