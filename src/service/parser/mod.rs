//! Free-text audit-response parser
//!
//! Converts the raw streamed text of an AI audit response into a structured
//! [`AuditReport`]. Extraction is a cascade of named heuristic rules over one
//! cleaned copy of the text; the parse is total and never fails, degrading to
//! generic fallback content when no rule matches.

pub mod rules;
pub mod severity;

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{
    AuditReport, CodeLocation, Optimization, OptimizationKind, PotentialSavings, Severity,
    Vulnerability,
};
use self::rules::{optimization_candidates, recommendation_candidates, vulnerability_candidates};
use self::severity::classify_risk;

/// Contextual metadata supplied by the caller
///
/// Used only to label finding locations; parsing works identically without it.
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub contract_name: Option<String>,
}

const DEFAULT_GAS_SCORE: u8 = 75;
const MIN_GAS_SCORE: u8 = 30;
const SCORE_PENALTY_PER_VULNERABILITY: u32 = 15;

const DEFAULT_CONTRACT_LABEL: &str = "Contract";

/// Streaming-protocol framing tokens left over from chunked transport
static FRAMING_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"data:\s*").unwrap());

/// Parse one fully-assembled audit response into a structured report.
///
/// Total function: garbage or empty input yields the emptiest valid report
/// plus default recommendations.
pub fn parse_audit_response(raw_text: &str, context: &AuditContext) -> AuditReport {
    let clean_text = normalize(raw_text);
    let lower_text = clean_text.to_lowercase();

    let overall_risk = classify_risk(&lower_text);
    let mut vulnerabilities = build_vulnerabilities(&clean_text, context);
    let mut optimizations = build_optimizations(&clean_text);
    let mut recommendations = collect_recommendations(&clean_text);

    // Fallback enrichment: weak topical evidence without a matched entry
    // still yields a renderable finding.
    if vulnerabilities.is_empty() && lower_text.contains("vulner") {
        vulnerabilities.push(generic_vulnerability(context));
    }
    if optimizations.is_empty() && (lower_text.contains("gas") || lower_text.contains("optim")) {
        optimizations.push(generic_optimization());
    }
    if recommendations.is_empty() {
        recommendations = default_recommendations();
    }

    let gas_efficiency_score = derive_gas_score(vulnerabilities.len());

    tracing::debug!(
        vulnerabilities = vulnerabilities.len(),
        optimizations = optimizations.len(),
        recommendations = recommendations.len(),
        risk = ?overall_risk,
        "Parsed audit response"
    );

    AuditReport {
        overall_risk,
        vulnerabilities_found: vulnerabilities.len(),
        optimizations_found: optimizations.len(),
        gas_efficiency_score,
        vulnerabilities,
        optimizations,
        recommendations,
    }
}

/// Strip transport framing and collapse doubled newlines.
///
/// The result is the clean text consumed by every extraction pass.
fn normalize(raw: &str) -> String {
    FRAMING_TOKEN
        .replace_all(raw, "")
        .replace("\n\n", "\n")
        .trim()
        .to_string()
}

/// Assemble vulnerabilities from the filtered candidate list.
///
/// Sequential ids are assigned in a single pass over the composed list, so
/// numbering never depends on per-rule counters.
fn build_vulnerabilities(clean_text: &str, context: &AuditContext) -> Vec<Vulnerability> {
    let contract = contract_label(context);

    vulnerability_candidates(clean_text)
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| Vulnerability {
            id: format!("vuln_{}", index + 1),
            severity: candidate.severity,
            impact: format!(
                "This {} severity issue could affect contract security",
                candidate.severity.descriptor()
            ),
            recommendation: format!(
                "Review and fix this {} priority vulnerability",
                candidate.severity.descriptor()
            ),
            title: candidate.title,
            description: candidate.description,
            location: CodeLocation {
                contract: Some(contract.clone()),
                ..CodeLocation::default()
            },
            references: Vec::new(),
        })
        .collect()
}

fn build_optimizations(clean_text: &str) -> Vec<Optimization> {
    optimization_candidates(clean_text)
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| Optimization {
            id: format!("opt_{}", index + 1),
            kind: OptimizationKind::Gas,
            potential_savings: estimate_savings(&candidate.description),
            implementation: format!("Consider implementing: {}", candidate.description),
            title: candidate.title,
            description: candidate.description,
            location: CodeLocation::default(),
        })
        .collect()
}

/// Insertion-ordered, deduplicated by exact match
fn collect_recommendations(clean_text: &str) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();
    for candidate in recommendation_candidates(clean_text) {
        if !recommendations.contains(&candidate) {
            recommendations.push(candidate);
        }
    }
    recommendations
}

/// Placeholder savings estimate, stable per description.
///
/// Spans the 100-1100 gas-unit and 2-12 percent bands.
fn estimate_savings(description: &str) -> PotentialSavings {
    let weight = description.chars().count() as u32;
    PotentialSavings {
        gas_units: 100 + (weight * 37) % 1000,
        percentage: 2 + weight % 10,
    }
}

fn contract_label(context: &AuditContext) -> String {
    context
        .contract_name
        .clone()
        .unwrap_or_else(|| DEFAULT_CONTRACT_LABEL.to_string())
}

fn generic_vulnerability(context: &AuditContext) -> Vulnerability {
    Vulnerability {
        id: "vuln_generic_1".to_string(),
        severity: Severity::Medium,
        title: "Potential Security Issue Detected".to_string(),
        description: "The audit identified potential security concerns that require review"
            .to_string(),
        location: CodeLocation {
            contract: Some(contract_label(context)),
            ..CodeLocation::default()
        },
        impact: "Could affect contract security if not addressed".to_string(),
        recommendation: "Review the full audit report and implement suggested fixes".to_string(),
        references: Vec::new(),
    }
}

fn generic_optimization() -> Optimization {
    Optimization {
        id: "opt_generic_1".to_string(),
        kind: OptimizationKind::Gas,
        title: "Gas Optimization Opportunities".to_string(),
        description: "The audit identified potential gas optimization improvements".to_string(),
        location: CodeLocation::default(),
        potential_savings: PotentialSavings {
            gas_units: 500,
            percentage: 5,
        },
        implementation: "Review the full audit report for specific optimization suggestions"
            .to_string(),
    }
}

fn default_recommendations() -> Vec<String> {
    [
        "Implement comprehensive testing",
        "Consider using established libraries like OpenZeppelin",
        "Add proper access controls",
        "Review and validate all external calls",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn derive_gas_score(vulnerability_count: usize) -> u8 {
    if vulnerability_count == 0 {
        return DEFAULT_GAS_SCORE;
    }
    let penalty = vulnerability_count as u32 * SCORE_PENALTY_PER_VULNERABILITY;
    90u32.saturating_sub(penalty).max(u32::from(MIN_GAS_SCORE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskLevel;

    #[test]
    fn test_empty_input_yields_default_report() {
        let report = parse_audit_response("", &AuditContext::default());

        assert_eq!(report.overall_risk, RiskLevel::Low);
        assert!(report.vulnerabilities.is_empty());
        assert!(report.optimizations.is_empty());
        assert_eq!(report.vulnerabilities_found, 0);
        assert_eq!(report.optimizations_found, 0);
        assert_eq!(report.recommendations.len(), 4);
        assert_eq!(report.gas_efficiency_score, 75);
    }

    #[test]
    fn test_normalization_strips_framing_and_doubled_newlines() {
        assert_eq!(normalize("data: line one\n\nline two"), "line one\nline two");
    }

    #[test]
    fn test_reentrancy_forces_high_risk() {
        let report = parse_audit_response(
            "The fallback path permits reentrancy.",
            &AuditContext::default(),
        );
        assert_eq!(report.overall_risk, RiskLevel::High);
    }

    #[test]
    fn test_two_vulnerabilities_score_sixty() {
        let text = "1. **Reentrancy Attack** - external call before state update\n\
                    2. **Integer Overflow** - unchecked arithmetic on balances";
        let report = parse_audit_response(text, &AuditContext::default());

        assert_eq!(report.vulnerabilities_found, 2);
        assert_eq!(report.vulnerabilities.len(), 2);
        assert_eq!(report.vulnerabilities[0].id, "vuln_1");
        assert_eq!(report.vulnerabilities[1].id, "vuln_2");
        assert_eq!(report.gas_efficiency_score, 60);
    }

    #[test]
    fn test_score_never_drops_below_floor() {
        assert_eq!(derive_gas_score(10), 30);
    }

    #[test]
    fn test_short_title_never_reaches_report() {
        let text = "1. **Bug** - overflow risk in the mint path";
        let report = parse_audit_response(text, &AuditContext::default());

        assert!(report.vulnerabilities.iter().all(|v| v.title != "Bug"));
    }

    #[test]
    fn test_generic_vulnerability_fallback() {
        let report = parse_audit_response(
            "This contract has a vulner issue but no specifics.",
            &AuditContext::default(),
        );

        assert_eq!(report.vulnerabilities_found, 1);
        assert_eq!(report.vulnerabilities[0].id, "vuln_generic_1");
        assert_eq!(report.vulnerabilities[0].severity, Severity::Medium);
    }

    #[test]
    fn test_generic_optimization_fallback() {
        let report =
            parse_audit_response("The gas spending looks fine here.", &AuditContext::default());

        assert_eq!(report.optimizations_found, 1);
        assert_eq!(report.optimizations[0].id, "opt_generic_1");
        assert_eq!(
            report.optimizations[0].potential_savings,
            PotentialSavings {
                gas_units: 500,
                percentage: 5
            }
        );
    }

    #[test]
    fn test_recommendations_deduplicate() {
        let text = "You should validate all inputs carefully\n\
                    You should validate all inputs carefully";
        let report = parse_audit_response(text, &AuditContext::default());

        assert_eq!(
            report.recommendations,
            vec!["validate all inputs carefully".to_string()]
        );
    }

    #[test]
    fn test_contract_name_labels_locations() {
        let context = AuditContext {
            contract_name: Some("DuckVault".to_string()),
        };
        let text = "1. **Reentrancy Attack** - external call before state update";
        let report = parse_audit_response(text, &context);

        assert_eq!(
            report.vulnerabilities[0].location.contract.as_deref(),
            Some("DuckVault")
        );
    }

    #[test]
    fn test_counts_always_match_list_lengths() {
        let inputs = [
            "",
            "data: nothing to see",
            "1. **Reentrancy Attack** - external call before state update",
            "This contract has a vulner issue but no specifics.",
            "The gas spending looks fine here.",
        ];

        for input in inputs {
            let report = parse_audit_response(input, &AuditContext::default());
            assert_eq!(report.vulnerabilities_found, report.vulnerabilities.len());
            assert_eq!(report.optimizations_found, report.optimizations.len());
        }
    }

    #[test]
    fn test_savings_estimate_is_deterministic_and_bounded() {
        let savings = estimate_savings("cache the array length outside the loop");
        assert_eq!(savings, estimate_savings("cache the array length outside the loop"));
        assert!((100..1100).contains(&savings.gas_units));
        assert!((2..12).contains(&savings.percentage));
    }
}
