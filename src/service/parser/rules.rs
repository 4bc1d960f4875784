//! Named extraction rules over the cleaned audit text
//!
//! Each rule is a pure pass `(text) -> Vec<Candidate>` backed by one compiled
//! pattern. Rules collect every match up front, so no cursor state is shared
//! between passes, and the composed candidate list preserves rule execution
//! order for sequential id assignment.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::severity::extract_severity;
use crate::model::Severity;

/// Titles at or below this length are near-certain false positives
const MIN_TITLE_CHARS: usize = 5;

/// Captured recommendations at or below this length are discarded as noise
const MIN_RECOMMENDATION_CHARS: usize = 10;

const GENERIC_VULNERABILITY_DESCRIPTION: &str = "Security vulnerability detected";
const GENERIC_OPTIMIZATION_DESCRIPTION: &str = "Gas optimization opportunity";

/// Numbered bold-titled entries: `1. **Title** - description **Severity: X**`
static NUMBERED_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\.\s*\*\*([^*]+)\*\*\s*[-:]?\s*([^*\n]+)(?:\*\*Severity[:\s]*([^*\n]+)\*\*)?")
        .unwrap()
});

/// Bullet-point bold-titled entries: `- **Title**: description`
static BULLET_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[•\-*]\s*\*\*([^*]+)\*\*\s*[-:]?\s*([^*\n]+)(?:\*\*Severity[:\s]*([^*\n]+)\*\*)?")
        .unwrap()
});

/// Bold titles introduced by a security keyword: `Risk: **Title** - description`
static KEYWORD_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:vulnerability|issue|problem|risk)[:\s]*\*\*([^*]+)\*\*\s*[-:]?\s*([^*\n]+)")
        .unwrap()
});

/// Bare severity word followed by free text: `High: unchecked arithmetic`
static SEVERITY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(critical|high|medium|low)[:\s]+([^\n]+)").unwrap());

/// Bold titles introduced by an optimization keyword
static TITLED_OPTIMIZATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:optimization|gas|efficiency)[:\s]*\*\*([^*]+)\*\*\s*[-:]?\s*([^*\n]+)")
        .unwrap()
});

/// Imperative optimization sentences: `optimize/improve/reduce ...`
static ACTION_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:optimize|improve|reduce)[:\s]+([^\n]+)").unwrap());

/// Gas-cost observations: `gas usage/deployment cost/transaction cost ...`
static COST_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:gas usage|deployment cost|transaction cost)[:\s]+([^\n]+)").unwrap()
});

/// Advice sentences: `recommend/suggest/should/consider ...`
static ADVICE_SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:recommend|suggest|should|consider)[:\s]+([^\n.]+)").unwrap()
});

/// Best-practice sentences: `best practice/improvement ...`
static PRACTICE_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:best practice|improvement)[:\s]+([^\n.]+)").unwrap());

/// Vulnerability candidate produced by one of the extraction rules
#[derive(Debug, Clone)]
pub(crate) struct VulnerabilityCandidate {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

/// Optimization candidate produced by one of the extraction rules
#[derive(Debug, Clone)]
pub(crate) struct OptimizationCandidate {
    pub title: String,
    pub description: String,
}

/// Run all vulnerability rules in order and filter out implausible titles
pub(crate) fn vulnerability_candidates(text: &str) -> Vec<VulnerabilityCandidate> {
    let mut candidates = Vec::new();
    candidates.extend(numbered_entries(text));
    candidates.extend(bullet_entries(text));
    candidates.extend(keyword_entries(text));
    candidates.extend(severity_lines(text));
    candidates.retain(is_plausible_vulnerability);
    candidates
}

fn numbered_entries(text: &str) -> Vec<VulnerabilityCandidate> {
    NUMBERED_ENTRY
        .captures_iter(text)
        .map(|caps| vulnerability_candidate(&caps, 2, 3, Some(4)))
        .collect()
}

fn bullet_entries(text: &str) -> Vec<VulnerabilityCandidate> {
    BULLET_ENTRY
        .captures_iter(text)
        .map(|caps| vulnerability_candidate(&caps, 1, 2, Some(3)))
        .collect()
}

fn keyword_entries(text: &str) -> Vec<VulnerabilityCandidate> {
    KEYWORD_ENTRY
        .captures_iter(text)
        .map(|caps| vulnerability_candidate(&caps, 1, 2, None))
        .collect()
}

fn severity_lines(text: &str) -> Vec<VulnerabilityCandidate> {
    SEVERITY_LINE
        .captures_iter(text)
        .map(|caps| vulnerability_candidate(&caps, 2, 2, None))
        .collect()
}

/// Build a candidate from one match.
///
/// Title prefers the explicit title group and falls back to the full match;
/// description falls back to a generic placeholder; severity scans the
/// explicit severity capture when the rule has one, else the full match.
fn vulnerability_candidate(
    caps: &Captures<'_>,
    title_group: usize,
    description_group: usize,
    severity_group: Option<usize>,
) -> VulnerabilityCandidate {
    let full_match = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
    let title = caps
        .get(title_group)
        .map(|m| m.as_str())
        .unwrap_or(full_match);
    let description = caps
        .get(description_group)
        .map(|m| m.as_str().trim())
        .unwrap_or_default();
    let severity_text = severity_group
        .and_then(|group| caps.get(group))
        .map(|m| m.as_str())
        .unwrap_or(full_match);

    VulnerabilityCandidate {
        title: clean_title(title),
        description: if description.is_empty() {
            GENERIC_VULNERABILITY_DESCRIPTION.to_string()
        } else {
            description.to_string()
        },
        severity: extract_severity(severity_text),
    }
}

fn is_plausible_vulnerability(candidate: &VulnerabilityCandidate) -> bool {
    candidate.title.chars().count() > MIN_TITLE_CHARS
        && !candidate.title.to_lowercase().contains("recommendation")
}

/// Run all optimization rules in order and filter out implausible titles
pub(crate) fn optimization_candidates(text: &str) -> Vec<OptimizationCandidate> {
    let mut candidates = Vec::new();
    candidates.extend(titled_optimizations(text));
    candidates.extend(action_sentences(text));
    candidates.extend(cost_sentences(text));
    candidates.retain(is_plausible_optimization);
    candidates
}

fn titled_optimizations(text: &str) -> Vec<OptimizationCandidate> {
    TITLED_OPTIMIZATION
        .captures_iter(text)
        .map(|caps| {
            let title = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let description = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            OptimizationCandidate {
                title: clean_title(title),
                description: if description.is_empty() {
                    GENERIC_OPTIMIZATION_DESCRIPTION.to_string()
                } else {
                    description.to_string()
                },
            }
        })
        .collect()
}

fn action_sentences(text: &str) -> Vec<OptimizationCandidate> {
    single_capture_optimizations(&ACTION_SENTENCE, text)
}

fn cost_sentences(text: &str) -> Vec<OptimizationCandidate> {
    single_capture_optimizations(&COST_SENTENCE, text)
}

/// Sentence rules reuse the captured text as both title and description
fn single_capture_optimizations(pattern: &Regex, text: &str) -> Vec<OptimizationCandidate> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            let captured = clean_title(m.as_str());
            OptimizationCandidate {
                description: captured.clone(),
                title: captured,
            }
        })
        .collect()
}

fn is_plausible_optimization(candidate: &OptimizationCandidate) -> bool {
    candidate.title.chars().count() > MIN_TITLE_CHARS
        && !candidate.title.to_lowercase().contains("vulnerability")
}

/// Run both recommendation rules in order; deduplication happens at the
/// report level so insertion order is preserved across rules.
pub(crate) fn recommendation_candidates(text: &str) -> Vec<String> {
    ADVICE_SENTENCE
        .captures_iter(text)
        .chain(PRACTICE_SENTENCE.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|rec| rec.chars().count() > MIN_RECOMMENDATION_CHARS)
        .collect()
}

fn clean_title(raw: &str) -> String {
    raw.trim().replace("**", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_entry_with_severity_capture() {
        let text = "1. **Unchecked External Call** - funds may be lost **Severity: Critical**";
        let candidates = vulnerability_candidates(text);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Unchecked External Call");
        assert_eq!(candidates[0].description, "funds may be lost");
        assert_eq!(candidates[0].severity, Severity::Critical);
    }

    #[test]
    fn test_bullet_entry() {
        let text = "- **Missing Access Control**: onlyOwner modifier absent";
        let candidates = vulnerability_candidates(text);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Missing Access Control");
        assert_eq!(candidates[0].description, "onlyOwner modifier absent");
        // No severity keyword anywhere in the match
        assert_eq!(candidates[0].severity, Severity::Medium);
    }

    #[test]
    fn test_keyword_entry() {
        let text = "Risk: **Unprotected Selfdestruct** - anyone can destroy the contract";
        let candidates = vulnerability_candidates(text);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Unprotected Selfdestruct");
        assert_eq!(
            candidates[0].description,
            "anyone can destroy the contract"
        );
    }

    #[test]
    fn test_severity_line_uses_free_text_as_title() {
        let text = "High: arithmetic performed without bounds checks";
        let candidates = vulnerability_candidates(text);

        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].title,
            "arithmetic performed without bounds checks"
        );
        assert_eq!(candidates[0].severity, Severity::High);
    }

    #[test]
    fn test_short_title_is_rejected() {
        let text = "1. **Bug** - something went wrong somewhere";
        assert!(vulnerability_candidates(text).is_empty());
    }

    #[test]
    fn test_recommendation_title_is_rejected() {
        let text = "1. **Recommendation Summary** - apply all of the fixes listed above";
        assert!(vulnerability_candidates(text).is_empty());
    }

    #[test]
    fn test_titled_optimization() {
        let text = "Gas: **Pack Storage Variables** - order struct members by size";
        let candidates = optimization_candidates(text);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Pack Storage Variables");
        assert_eq!(candidates[0].description, "order struct members by size");
    }

    #[test]
    fn test_action_sentence_reuses_capture() {
        let text = "reduce the number of storage writes in the loop";
        let candidates = optimization_candidates(text);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, candidates[0].description);
        assert_eq!(
            candidates[0].title,
            "the number of storage writes in the loop"
        );
    }

    #[test]
    fn test_vulnerability_titled_optimization_is_rejected() {
        let text = "Gas: **Vulnerability In Loop** - described elsewhere";
        assert!(optimization_candidates(text).is_empty());
    }

    #[test]
    fn test_recommendations_stop_at_sentence_end() {
        let text = "You should validate every external input. Other text follows.";
        let recommendations = recommendation_candidates(text);

        assert_eq!(recommendations, vec!["validate every external input"]);
    }

    #[test]
    fn test_short_recommendations_are_dropped() {
        let text = "We suggest caution.";
        assert!(recommendation_candidates(text).is_empty());
    }
}
