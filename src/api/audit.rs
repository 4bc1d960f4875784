//! REST API endpoints for contract audits

use actix_web::{HttpResponse, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::model::AuditReport;
use crate::service::AuditService;
use crate::service::audit::AuditRequest;

/// Request body for creating an audit
#[derive(Debug, Deserialize, ToSchema)]
pub struct AuditRequestBody {
    /// Contract address to resolve verified source code from the explorer
    pub contract_address: Option<String>,
    /// Contract source code to audit directly (takes precedence)
    pub source_code: Option<String>,
    /// Contract name used to label finding locations
    pub contract_name: Option<String>,
}

/// Structured audit response
#[derive(Debug, Serialize, ToSchema)]
pub struct AuditResponse {
    pub report: AuditReport,
    pub request_id: String,
    pub generated_at: String,
}

/// Audit a smart contract
#[utoipa::path(
    post,
    path = "/v1/audits",
    request_body = AuditRequestBody,
    responses(
        (status = 200, description = "Audit completed", body = AuditResponse),
        (status = 400, description = "Invalid request"),
        (status = 422, description = "Contract source unavailable"),
        (status = 502, description = "Upstream service error")
    ),
    tag = "audits"
)]
#[post("/v1/audits")]
pub async fn create_audit(
    service: web::Data<AuditService>,
    body: web::Json<AuditRequestBody>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let request = AuditRequest {
        contract_address: body.contract_address,
        source_code: body.source_code,
        contract_name: body.contract_name,
    };

    let report = service.run_audit(request).await?;

    Ok(HttpResponse::Ok().json(AuditResponse {
        report,
        request_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now().to_rfc3339(),
    }))
}

/// OpenAPI documentation for the audit API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_audit,
        crate::api::chat::chat,
        crate::api::health::liveness,
        crate::api::health::readiness
    ),
    components(schemas(
        AuditRequestBody,
        AuditResponse,
        crate::api::chat::ChatRequestBody,
        crate::api::chat::ChatResponseBody,
        crate::api::health::HealthStatus,
        crate::api::health::ReadinessStatus,
        crate::api::health::DependencyHealth,
        crate::model::AuditReport,
        crate::model::Vulnerability,
        crate::model::Optimization,
        crate::model::OptimizationKind,
        crate::model::PotentialSavings,
        crate::model::CodeLocation,
        crate::model::Severity,
        crate::model::RiskLevel
    )),
    tags(
        (name = "audits", description = "Smart contract audit endpoints"),
        (name = "chat", description = "Web3 assistant endpoints"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

/// Configure audit routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_audit);
}
