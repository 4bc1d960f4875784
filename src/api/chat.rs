//! REST API endpoint for the Web3 assistant chat

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::service::ChainGptClient;
use crate::service::chaingpt::ChatContext;

/// Request body for a chat message
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequestBody {
    /// User message for the assistant
    pub message: String,
    /// Optional contract source appended as context (truncated)
    pub contract_code: Option<String>,
    /// Optional vulnerability count from a prior audit, appended as context
    pub vulnerabilities_found: Option<usize>,
}

/// Assistant reply with follow-up suggestions
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponseBody {
    pub response: String,
    pub suggestions: Vec<String>,
}

/// Chat with the Web3 assistant
#[utoipa::path(
    post,
    path = "/v1/chat",
    request_body = ChatRequestBody,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponseBody),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Upstream service error")
    ),
    tag = "chat"
)]
#[post("/v1/chat")]
pub async fn chat(
    client: web::Data<ChainGptClient>,
    body: web::Json<ChatRequestBody>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let context = ChatContext {
        contract_code: body.contract_code,
        vulnerabilities_found: body.vulnerabilities_found,
    };

    let reply = client.chat(&body.message, &context).await?;

    Ok(HttpResponse::Ok().json(ChatResponseBody {
        response: reply.response,
        suggestions: reply.suggestions,
    }))
}

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat);
}
