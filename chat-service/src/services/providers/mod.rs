//! Upstream generation provider abstraction.
//!
//! The handler talks to a [`ChatProvider`] trait object so tests can swap the
//! real Gemini client for a mock.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use service_core::error::AppError;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("{0}")]
    Api(String),

    #[error("Upstream returned no content; the response may have been withheld by safety filtering")]
    EmptyResponse,

    #[error("Network error: {0}")]
    Network(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => AppError::ConfigError(anyhow::anyhow!(msg)),
            ProviderError::Api(msg) => AppError::UpstreamError(msg),
            ProviderError::EmptyResponse => AppError::EmptyResponse(err.to_string()),
            ProviderError::Network(msg) => {
                AppError::InternalError(anyhow::anyhow!("Network error: {}", msg))
            }
        }
    }
}

/// Trait for chat generation providers (Gemini in production, mock in tests).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Relay the conversation history upstream and return the generated text.
    async fn generate(&self, history: &[Value]) -> Result<String, ProviderError>;
}
