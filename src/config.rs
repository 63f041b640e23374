//! Application Configuration
//!
//! Typed configuration for the two outbound services: the AI provider
//! (metadata extraction + embeddings) and the questionnaire generation
//! webhook. There is no persisted config file; everything is read from
//! environment variables at startup.

use crate::utils::error::{AppError, AppResult};

/// Production generation webhook endpoint (Make scenario).
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://hook.us2.make.com/a18h6yc94x6rp6s1m7do3tij3xontr85";

/// Hard timeout for the generation webhook call, in seconds.
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 180;

/// Default chat model for metadata extraction.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Configuration for the AI provider (OpenAI or a compatible API).
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Chat model used for metadata extraction.
    pub chat_model: String,
    /// Embedding model.
    pub embedding_model: String,
    /// API base URL override (e.g. Azure OpenAI, vLLM, LiteLLM).
    pub base_url: Option<String>,
}

impl AiConfig {
    /// Create a config with default models for the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: None,
        }
    }
}

/// Configuration for the questionnaire generation webhook.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Webhook endpoint URL.
    pub url: String,
    /// Per-request timeout in seconds. The call is a single attempt; a
    /// timeout fails the generation rather than retrying.
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WEBHOOK_URL.to_string(),
            timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// - `OPENAI_API_KEY` (required)
    /// - `QUESTGEN_OPENAI_BASE_URL` (optional base URL override)
    /// - `QUESTGEN_WEBHOOK_URL` (optional, defaults to the Make endpoint)
    /// - `QUESTGEN_WEBHOOK_TIMEOUT_SECS` (optional, defaults to 180)
    pub fn from_env() -> AppResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::config("OPENAI_API_KEY is not set"))?;

        let mut ai = AiConfig::new(api_key);
        if let Ok(url) = std::env::var("QUESTGEN_OPENAI_BASE_URL") {
            ai.base_url = Some(url);
        }

        let mut webhook = WebhookConfig::default();
        if let Ok(url) = std::env::var("QUESTGEN_WEBHOOK_URL") {
            webhook.url = url;
        }
        if let Ok(timeout) = std::env::var("QUESTGEN_WEBHOOK_TIMEOUT_SECS") {
            webhook.timeout_secs = timeout.parse().map_err(|_| {
                AppError::config("QUESTGEN_WEBHOOK_TIMEOUT_SECS must be an integer")
            })?;
        }

        Ok(Self { ai, webhook })
    }
}
