//! Provider that never answers.
//!
//! Selecting it routes every question to the caller's fallback path, which
//! is useful without network access or model weights.

use crate::client::{ChatRequest, LlmClient, LlmResponse};
use chatbox_core::{AppError, AppResult};

/// Client whose every request fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineClient;

#[async_trait::async_trait]
impl LlmClient for OfflineClient {
    fn provider_name(&self) -> &str {
        "offline"
    }

    async fn chat(&self, _request: &ChatRequest) -> AppResult<LlmResponse> {
        Err(AppError::Llm("offline provider does not answer".to_string()))
    }
}
