//! Application state and service initialization
//!
//! This module centralizes client and service construction, making it easier
//! to manage the application lifecycle and inject dependencies into handlers.

use crate::model::Config;
use crate::service::{AuditService, ChainGptClient, ExplorerClient};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Resolved configuration, exposed to handlers (e.g. readiness probe)
    pub config: Config,
    /// Audit orchestration service
    pub audit_service: AuditService,
    /// ChainGPT client, used directly by the chat endpoint
    pub chaingpt: ChainGptClient,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// Requires CHAINGPT_API_KEY to be configured; everything else falls back
    /// to defaults.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let api_key = config
            .chaingpt_api_key
            .clone()
            .ok_or(AppError::MissingConfig("CHAINGPT_API_KEY"))?;

        let chaingpt = ChainGptClient::new(api_key, config.chaingpt_base_url.clone());
        let explorer = ExplorerClient::new(config.explorer_base_url.clone());
        let audit_service = AuditService::new(chaingpt.clone(), explorer);

        Ok(Self {
            config,
            audit_service,
            chaingpt,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),
}
