//! Feature Extractors
//!
//! Five independent structural extractors plus the context keyword scorer.
//! Each extractor returns one sub-score in [0, 1]; parsing failures fail
//! open to 0.0 so a malformed artifact never raises.

use once_cell::sync::Lazy;
use regex::Regex;

use super::rules::{DomainTables, CONTEXT_KEYWORDS, CONTEXT_SCORE_CAP, KEYWORD_INCREMENT};
use super::types::FeatureScoreSet;

// ============================================================================
// EXTRACTOR CONSTANTS
// ============================================================================

/// URL length above this scores 0.8
const VERY_LONG_URL_LEN: usize = 200;

/// URL length above this scores 0.5
const LONG_URL_LEN: usize = 100;

/// Combined '@' and '?' count above this scores 0.6
const SPECIAL_CHAR_LIMIT: usize = 2;

/// Dots in the authority above this score 0.6
const SUBDOMAIN_DOT_LIMIT: usize = 3;

// Both patterns are searched, not anchored, matching anywhere in the
// artifact. The shape class keeps $-_ as a range.
static URL_SHAPE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),])+").unwrap());

static IP_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http[s]?://\d+\.\d+\.\d+\.\d+").unwrap());

// ============================================================================
// SHAPE & PARSING
// ============================================================================

/// True when the artifact carries an http/https scheme followed by
/// at least one character from the accepted class
pub fn is_valid_url(url: &str) -> bool {
    !url.is_empty() && URL_SHAPE_PATTERN.is_match(url)
}

/// Authority component (between the first "://" and the next '/'),
/// case-folded. None when the artifact has no scheme separator.
pub fn authority(url: &str) -> Option<String> {
    let start = url.find("://")? + 3;
    let rest = &url[start..];
    let end = rest.find('/').unwrap_or(rest.len());
    Some(rest[..end].to_lowercase())
}

// ============================================================================
// STRUCTURAL EXTRACTORS
// ============================================================================

/// Length score: long URLs are a weak phishing signal
pub fn length_score(url: &str) -> f32 {
    let length = url.len();
    if length > VERY_LONG_URL_LEN {
        0.8
    } else if length > LONG_URL_LEN {
        0.5
    } else {
        0.0
    }
}

/// Domain reputation: exact table hit, then flagged TLD fragment,
/// then the lookalike check
pub fn domain_score(url: &str, tables: &DomainTables) -> f32 {
    let domain = match authority(url) {
        Some(domain) => domain,
        None => return 0.0,
    };

    if let Some(weight) = tables.domains.get(&domain) {
        return *weight;
    }

    for tld in &tables.flagged_tlds {
        if domain.contains(tld.as_str()) {
            return 0.7;
        }
    }

    if is_lookalike_domain(&domain, tables) {
        return 0.7;
    }

    0.0
}

/// Lookalike rule: the authority carries a brand token and the full brand
/// name but is not the brand's own .com domain
fn is_lookalike_domain(domain: &str, tables: &DomainTables) -> bool {
    for (token, brands) in &tables.lookalikes {
        if !domain.contains(token.as_str()) {
            continue;
        }
        for brand in brands {
            if domain.contains(brand.as_str()) && domain != format!("{}.com", brand) {
                return true;
            }
        }
    }
    false
}

/// Special character score: more than 2 of '@' or '?' combined
pub fn special_char_score(url: &str) -> f32 {
    let count = url.matches('@').count() + url.matches('?').count();
    if count > SPECIAL_CHAR_LIMIT {
        0.6
    } else {
        0.0
    }
}

/// IP-literal score: scheme followed by a dotted-decimal address
pub fn ip_address_score(url: &str) -> f32 {
    if IP_URL_PATTERN.is_match(url) {
        0.8
    } else {
        0.0
    }
}

/// Subdomain depth score: more than 3 dots in the authority
pub fn subdomain_score(url: &str) -> f32 {
    match authority(url) {
        Some(domain) => {
            if domain.matches('.').count() > SUBDOMAIN_DOT_LIMIT {
                0.6
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}

/// Run all five structural extractors
pub fn extract(url: &str, tables: &DomainTables) -> FeatureScoreSet {
    FeatureScoreSet {
        length: length_score(url),
        domain: domain_score(url, tables),
        special_chars: special_char_score(url),
        ip_address: ip_address_score(url),
        subdomains: subdomain_score(url),
    }
}

// ============================================================================
// CONTEXT SCORING
// ============================================================================

/// Context keyword score: 0.15 per occurrence, capped at 0.5
pub fn context_score(context: &str) -> f32 {
    if context.is_empty() {
        return 0.0;
    }

    let lower = context.to_lowercase();
    let count: usize = CONTEXT_KEYWORDS
        .iter()
        .map(|kw| lower.matches(kw).count())
        .sum();

    (count as f32 * KEYWORD_INCREMENT).min(CONTEXT_SCORE_CAP)
}

// ============================================================================
// TESTS
// ============================================================================
