use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;

use crate::services::providers::gemini::GEMINI_API_BASE;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
    /// Upstream base URL; only overridden by tests.
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model used for generation (e.g., gemini-2.0-flash).
    pub text_model: String,
}

impl ChatConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = core_config::is_prod();

        // Outside production the key defaults to empty: the service starts,
        // and the provider rejects each request before any network call.
        Ok(ChatConfig {
            common,
            google: GoogleConfig {
                api_key: Secret::new(core_config::get_env("GEMINI_API_KEY", Some(""), is_prod)?),
                api_base: core_config::get_env(
                    "CHAT_UPSTREAM_BASE_URL",
                    Some(GEMINI_API_BASE),
                    is_prod,
                )?,
            },
            models: ModelConfig {
                text_model: core_config::get_env(
                    "CHAT_TEXT_MODEL",
                    Some("gemini-2.0-flash"),
                    is_prod,
                )?,
            },
        })
    }
}
