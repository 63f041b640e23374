//! Questionnaire Generation Gateway
//!
//! Sends the embedding + reviewed metadata to the external generation
//! webhook (a Make scenario) and classifies the reply. The call is a single
//! attempt with a hard timeout; transport trouble surfaces as a generation
//! error with no retry.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::WebhookConfig;
use crate::models::MetadataRecord;
use crate::utils::error::{AppError, AppResult};

/// The webhook's reply, classified once at the gateway boundary.
///
/// Make scenarios reply in three shapes observed in production: a JSON
/// object/array, a JSON string wrapping the questionnaire JSON, or plain
/// text (possibly fenced). Downstream code always works from
/// [`canonical_text`](GenerationReply::canonical_text).
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationReply {
    /// Body was a JSON object or array.
    Structured(Value),
    /// Body was a JSON string; the contained text is the payload.
    JsonText(String),
    /// Body was not JSON at all; deferred to the lenient loader.
    OpaqueText(String),
}

impl GenerationReply {
    /// Classify a raw response body.
    pub fn classify(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::String(inner)) => Self::JsonText(inner),
            Ok(value) => Self::Structured(value),
            Err(_) => Self::OpaqueText(body.to_string()),
        }
    }

    /// The JSON text downstream parsing operates on.
    pub fn canonical_text(&self) -> String {
        match self {
            Self::Structured(value) => value.to_string(),
            Self::JsonText(text) | Self::OpaqueText(text) => text.clone(),
        }
    }
}

/// Generation webhook seam for the Generate step.
#[async_trait]
pub trait QuestionnaireGateway: Send + Sync {
    /// Submit the embedding and reviewed metadata for questionnaire
    /// generation, correlated by `processing_id`.
    async fn generate(
        &self,
        embedding: Option<&[f32]>,
        metadata: &MetadataRecord,
        processing_id: &str,
    ) -> AppResult<GenerationReply>;
}

/// [`QuestionnaireGateway`] backed by an HTTP webhook.
pub struct MakeWebhookClient {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl MakeWebhookClient {
    pub fn new(config: WebhookConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::generation(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl QuestionnaireGateway for MakeWebhookClient {
    async fn generate(
        &self,
        embedding: Option<&[f32]>,
        metadata: &MetadataRecord,
        processing_id: &str,
    ) -> AppResult<GenerationReply> {
        let payload = json!({
            "embedding": embedding,
            "brief_name": format!("{}.docx", processing_id),
            "metadata": metadata,
            "processing_id": processing_id,
        });

        info!(processing_id, url = %self.config.url, "sending generation request");

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::generation(format!("Webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::generation(format!(
                "Webhook returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::generation(format!("Failed to read webhook reply: {}", e)))?;

        let reply = GenerationReply::classify(&body);
        debug!(processing_id, bytes = body.len(), "generation reply received");
        Ok(reply)
    }
}
