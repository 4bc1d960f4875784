//! ChainGPT client for contract audits and Web3 chat
//!
//! Talks to the ChainGPT streaming chat endpoint, assembles the streamed
//! body, and hands audit responses to the response parser.

use futures_util::StreamExt;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Instant;
use url::Url;

use crate::model::AuditReport;
use crate::service::parser::{self, AuditContext};

pub mod prompts;
pub mod suggestions;

const STREAM_PATH: &str = "chat/stream";

/// Model used for contract audits
const MODEL_AUDITOR: &str = "smart_contract_auditor";

/// Model used for the Web3 assistant chat
const MODEL_ASSISTANT: &str = "general_assistant";

/// Reply when the assistant comes back with nothing usable
const EMPTY_CHAT_FALLBACK: &str =
    "I'm here to help with Web3 and smart contract questions. What would you like to know?";

/// Transport framing stripped from raw chat replies
static FRAMING_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"data:\s*").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum ChainGptError {
    /// Transport-level failure talking to the API
    #[error("ChainGPT request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the API
    #[error("ChainGPT returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The assembled stream was empty; the parser is never invoked on absent data
    #[error("ChainGPT returned an empty response")]
    EmptyResponse,
}

/// Request body for the streaming chat endpoint
#[derive(Debug, Serialize)]
struct StreamRequest<'a> {
    model: &'a str,
    question: &'a str,
    #[serde(rename = "chatHistory")]
    chat_history: &'a str,
}

/// Optional context appended to a chat question
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    pub contract_code: Option<String>,
    pub vulnerabilities_found: Option<usize>,
}

/// Assistant reply plus contextual follow-up suggestions
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub suggestions: Vec<String>,
}

/// Client for the ChainGPT chat/audit API
#[derive(Clone)]
pub struct ChainGptClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl ChainGptClient {
    pub fn new(api_key: String, base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Audit contract source code and parse the response into a report
    pub async fn audit_contract(
        &self,
        source_code: &str,
        context: &AuditContext,
    ) -> Result<AuditReport, ChainGptError> {
        let question = prompts::build_audit_prompt(source_code);

        tracing::debug!(
            model = MODEL_AUDITOR,
            prompt_length = question.len(),
            "Requesting contract audit"
        );
        let started = Instant::now();

        let response_text = self.stream_completion(MODEL_AUDITOR, &question).await?;
        if response_text.trim().is_empty() {
            return Err(ChainGptError::EmptyResponse);
        }

        tracing::info!(
            model = MODEL_AUDITOR,
            elapsed_ms = started.elapsed().as_millis(),
            response_length = response_text.len(),
            "Audit response received"
        );

        Ok(parser::parse_audit_response(&response_text, context))
    }

    /// Chat with the Web3 assistant
    pub async fn chat(
        &self,
        message: &str,
        context: &ChatContext,
    ) -> Result<ChatReply, ChainGptError> {
        let question = prompts::build_chat_question(message, context);

        tracing::debug!(
            model = MODEL_ASSISTANT,
            prompt_length = question.len(),
            "Sending chat message"
        );

        let raw = self.stream_completion(MODEL_ASSISTANT, &question).await?;
        let mut response = unwrap_bot_reply(&raw);
        if response.is_empty() {
            response = EMPTY_CHAT_FALLBACK.to_string();
        }

        Ok(ChatReply {
            response,
            suggestions: suggestions::for_message(message),
        })
    }

    /// POST to the streaming endpoint and assemble the chunked body
    async fn stream_completion(&self, model: &str, question: &str) -> Result<String, ChainGptError> {
        let url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            STREAM_PATH
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&StreamRequest {
                model,
                question,
                chat_history: "off",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "ChainGPT API error");
            return Err(ChainGptError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut stream = response.bytes_stream();
        let mut assembled: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            assembled.extend_from_slice(&chunk?);
        }

        Ok(String::from_utf8_lossy(&assembled).into_owned())
    }
}

/// Unwrap a `{"data": {"bot": ...}}` envelope; fall back to framing-stripped text
fn unwrap_bot_reply(raw: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw)
        && let Some(bot) = value.pointer("/data/bot").and_then(|v| v.as_str())
    {
        return bot.to_string();
    }

    FRAMING_TOKEN.replace_all(raw, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_bot_reply_from_envelope() {
        let raw = r#"{"data": {"bot": "Reentrancy is a recursive-call attack."}}"#;
        assert_eq!(unwrap_bot_reply(raw), "Reentrancy is a recursive-call attack.");
    }

    #[test]
    fn test_unwrap_bot_reply_strips_framing() {
        assert_eq!(unwrap_bot_reply("data: plain streamed text"), "plain streamed text");
    }

    #[test]
    fn test_unwrap_bot_reply_ignores_other_json() {
        assert_eq!(unwrap_bot_reply(r#"{"other": 1}"#), r#"{"other": 1}"#);
    }
}
