//! Audit orchestration: source resolution, AI audit, response parsing

use crate::model::AuditReport;
use crate::service::chaingpt::{ChainGptClient, ChainGptError};
use crate::service::explorer::{ExplorerClient, ExplorerError};
use crate::service::parser::AuditContext;

/// One audit request, as accepted by the API layer
#[derive(Debug, Clone, Default)]
pub struct AuditRequest {
    pub contract_address: Option<String>,
    pub source_code: Option<String>,
    pub contract_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    /// Neither source code nor a contract address was supplied
    #[error("Either source_code or contract_address must be provided")]
    MissingInput,

    /// The explorer has no verified source for the contract
    #[error("No verified source code available for contract {0}")]
    SourceUnavailable(String),

    #[error(transparent)]
    Explorer(#[from] ExplorerError),

    #[error(transparent)]
    ChainGpt(#[from] ChainGptError),
}

/// Service orchestrating explorer lookups and ChainGPT audits
pub struct AuditService {
    chaingpt: ChainGptClient,
    explorer: ExplorerClient,
}

impl AuditService {
    pub fn new(chaingpt: ChainGptClient, explorer: ExplorerClient) -> Self {
        Self { chaingpt, explorer }
    }

    /// Run a full audit: resolve source, query the auditor model, parse
    pub async fn run_audit(&self, request: AuditRequest) -> Result<AuditReport, AuditServiceError> {
        let (source_code, contract_name) = self.resolve_source(&request).await?;

        tracing::info!(
            source_length = source_code.len(),
            contract = contract_name.as_deref().unwrap_or("unknown"),
            "Running contract audit"
        );

        let context = AuditContext { contract_name };
        let report = self.chaingpt.audit_contract(&source_code, &context).await?;

        tracing::info!(
            vulnerabilities = report.vulnerabilities_found,
            optimizations = report.optimizations_found,
            risk = ?report.overall_risk,
            "Audit complete"
        );

        Ok(report)
    }

    /// Explicit source code wins; otherwise the explorer resolves it by address
    async fn resolve_source(
        &self,
        request: &AuditRequest,
    ) -> Result<(String, Option<String>), AuditServiceError> {
        if let Some(source) = request.source_code.as_deref()
            && !source.trim().is_empty()
        {
            return Ok((source.to_string(), request.contract_name.clone()));
        }

        let Some(address) = request.contract_address.as_deref() else {
            return Err(AuditServiceError::MissingInput);
        };

        let metadata = self.explorer.contract_info(address).await?;
        if metadata.source_code.trim().is_empty() {
            return Err(AuditServiceError::SourceUnavailable(address.to_string()));
        }

        let contract_name = request.contract_name.clone().or(Some(metadata.name));
        Ok((metadata.source_code, contract_name))
    }
}
