use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Seriousness of a single vulnerability finding.
///
/// Ordered so that `Critical > High > Medium > Low` for risk aggregation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Lowercase descriptor used when synthesizing impact/recommendation text
    pub fn descriptor(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Overall risk classification of an audited contract
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Where a finding lives inside the audited contract
///
/// The response parser only ever fills `contract` (from the caller-supplied
/// hint); line and function are populated when a finding carries an explicit
/// source location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CodeLocation {
    pub line: Option<u32>,
    pub function: Option<String>,
    pub contract: Option<String>,
}

/// A single security finding extracted from the audit response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Vulnerability {
    /// Unique within one report, sequential (`vuln_1`, `vuln_2`, ...)
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub location: CodeLocation,
    pub impact: String,
    pub recommendation: String,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizationKind {
    Gas,
    Logic,
    Security,
}

/// Estimated savings for one optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PotentialSavings {
    pub gas_units: u32,
    pub percentage: u32,
}

/// A gas/logic improvement opportunity extracted from the audit response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Optimization {
    /// Unique within one report, sequential (`opt_1`, `opt_2`, ...)
    pub id: String,
    pub kind: OptimizationKind,
    pub title: String,
    pub description: String,
    pub location: CodeLocation,
    pub potential_savings: PotentialSavings,
    pub implementation: String,
}

/// Structured audit report assembled from one AI audit response
///
/// `vulnerabilities_found` and `optimizations_found` are always recomputed
/// from the final list lengths during finalization, never tracked
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditReport {
    pub overall_risk: RiskLevel,
    pub vulnerabilities_found: usize,
    pub optimizations_found: usize,
    /// Heuristic 0-100 health indicator derived from the vulnerability count
    pub gas_efficiency_score: u8,
    pub vulnerabilities: Vec<Vulnerability>,
    pub optimizations: Vec<Optimization>,
    /// Insertion-ordered, deduplicated
    pub recommendations: Vec<String>,
}

/// Contract details resolved from the block explorer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContractMetadata {
    pub address: String,
    pub name: String,
    pub compiler: String,
    pub version: String,
    pub optimization: bool,
    pub source_code: String,
    #[schema(value_type = Object)]
    pub abi: serde_json::Value,
    pub constructor_args: Option<String>,
    pub verified: bool,
}
