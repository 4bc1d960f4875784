pub mod config;
pub mod report;

pub use config::Config;
pub use report::{
    AuditReport, CodeLocation, ContractMetadata, Optimization, OptimizationKind, PotentialSavings,
    RiskLevel, Severity, Vulnerability,
};
