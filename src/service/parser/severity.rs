//! Severity and risk keyword heuristics
//!
//! One keyword-to-severity mapping is shared by overall risk classification
//! and per-finding severity derivation so the two never disagree.

use crate::model::{RiskLevel, Severity};

/// Keywords that mark the whole response as high risk
const HIGH_RISK_KEYWORDS: &[&str] = &[
    "critical",
    "severe",
    "high risk",
    "dangerous",
    "exploit",
    "reentrancy",
    "overflow",
    "underflow",
];

/// Keywords that mark the whole response as medium risk
const MEDIUM_RISK_KEYWORDS: &[&str] = &["medium", "moderate", "caution", "warning", "potential"];

/// Keywords that mark the whole response as low risk
const LOW_RISK_KEYWORDS: &[&str] = &["low", "minor", "informational", "best practice"];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// Classify the overall risk of a response.
///
/// Expects the lowercased clean text; the first matching keyword set in
/// HIGH -> MEDIUM -> LOW priority order wins, and no match defaults to LOW.
pub(crate) fn classify_risk(lower_text: &str) -> RiskLevel {
    if contains_any(lower_text, HIGH_RISK_KEYWORDS) {
        return RiskLevel::High;
    }
    if contains_any(lower_text, MEDIUM_RISK_KEYWORDS) {
        return RiskLevel::Medium;
    }
    if contains_any(lower_text, LOW_RISK_KEYWORDS) {
        return RiskLevel::Low;
    }
    RiskLevel::Low
}

/// Derive a finding severity from a fragment of matched text.
///
/// CRITICAL beats HIGH beats MEDIUM beats LOW when several keywords appear;
/// no keyword at all defaults to MEDIUM.
pub(crate) fn extract_severity(text: &str) -> Severity {
    let lower = text.to_lowercase();

    if lower.contains("critical") {
        Severity::Critical
    } else if lower.contains("high") {
        Severity::High
    } else if lower.contains("medium") || lower.contains("moderate") {
        Severity::Medium
    } else if lower.contains("low") || lower.contains("minor") {
        Severity::Low
    } else {
        Severity::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentrancy_classifies_high() {
        assert_eq!(
            classify_risk("the withdraw function allows reentrancy"),
            RiskLevel::High
        );
    }

    #[test]
    fn test_moderate_without_high_keyword_classifies_medium() {
        assert_eq!(
            classify_risk("a moderate concern around input validation"),
            RiskLevel::Medium
        );
    }

    #[test]
    fn test_high_wins_over_medium() {
        assert_eq!(
            classify_risk("moderate issues plus a critical flaw"),
            RiskLevel::High
        );
    }

    #[test]
    fn test_no_keywords_defaults_low() {
        assert_eq!(classify_risk("the code compiles fine"), RiskLevel::Low);
    }

    #[test]
    fn test_critical_beats_high() {
        assert_eq!(
            extract_severity("Critical: high impact on funds"),
            Severity::Critical
        );
    }

    #[test]
    fn test_moderate_maps_to_medium() {
        assert_eq!(extract_severity("a moderate flaw"), Severity::Medium);
    }

    #[test]
    fn test_minor_maps_to_low() {
        assert_eq!(extract_severity("minor style issue"), Severity::Low);
    }

    #[test]
    fn test_no_keyword_defaults_medium() {
        assert_eq!(extract_severity("unchecked external call"), Severity::Medium);
    }
}
