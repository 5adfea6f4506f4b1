//! Mock provider implementation for testing.

use super::{ChatProvider, ProviderError};
use async_trait::async_trait;
use serde_json::Value;

/// Mock chat provider returning a canned reply, or failing like an upstream
/// that withheld its content.
pub struct MockChatProvider {
    reply: Option<String>,
}

impl MockChatProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
        }
    }

    pub fn withholding() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn generate(&self, _history: &[Value]) -> Result<String, ProviderError> {
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(ProviderError::EmptyResponse),
        }
    }
}
