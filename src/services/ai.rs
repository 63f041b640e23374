//! Metadata / Embedding Gateway
//!
//! Talks to OpenAI (or a compatible API) for the two Process-step calls:
//! structured metadata extraction over the combined document text, and a
//! single embedding vector over the same text. Both calls fail soft: the
//! wizard continues with a defaulted record or without an embedding, and
//! the failure is logged rather than propagated.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AiConfig;
use crate::models::MetadataRecord;
use crate::utils::error::{AppError, AppResult};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// System prompt for the extraction call.
const EXTRACTION_SYSTEM_PROMPT: &str =
    "Eres un experto en extracción estructurada de metadata.";

/// Instruction template for the extraction call. The combined document text
/// is appended after the final line.
const EXTRACTION_PROMPT_HEADER: &str = r#"Actúa como extractor estructurado de metadata para la base de datos de briefs y KOs de estudios de investigación de mercados.

Voy a proporcionarte el texto completo de un Brief y/o su KO (Kick Off). A veces ambos, a veces solo uno.

Tu tarea es leer este texto y devolver SOLO la siguiente estructura de metadata, en formato JSON válido. No agregues texto adicional ni explicaciones, solo devuelve el JSON.

### Importante:

- El texto del KO puede contener información que no se debe incluir en el embedding (metodología final, muestra acordada, cronograma). NO incluyas esa información en los campos `objetivo_general`, `preguntas_negocio`, `hipotesis`, `texto_preview`.
- `texto_preview` debe contener únicamente fragmentos que describan el contexto del problema, los objetivos de negocio y el reto planteado por el cliente, SIN incluir menciones a "PCT", "U&A", "400 entrevistas", "CAWI", "metodología", "timeline", etc.
- Si el texto incluye preguntas de negocio, extrae la lista textual de esas preguntas. Si no hay, deja `preguntas_negocio` como [].
- Si algún campo no está explícito, déjalo vacío ("") o en [] según corresponda. No inventes nada.

Además, incluye los siguientes dos campos adicionales para control de calidad:

- `"tiene_brief"`: true si en el texto hay evidencia de que se incluye un Brief o contexto original del cliente.
- `"tiene_kickoff"`: true si en el texto hay evidencia de que es un KO, minuta de Kick Off o similar.

ESTRUCTURA:

{
    "tipo_estudio": "",
    "nombre_proyecto": "",
    "marca": "",
    "industria": "",
    "objetivo_general": "",
    "preguntas_negocio": [],
    "decisiones_a_tomar": "",
    "target": "",
    "muestra_planificada": "",
    "hipotesis": "",
    "texto_preview": "",
    "archivo_link": "",
    "tiene_brief": false,
    "tiene_kickoff": false
}

Aquí está el texto completo:

"#;

/// Result of a metadata extraction attempt. The record is always usable;
/// `degraded` marks that the model call or parse failed and the record is
/// the empty default.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtraction {
    pub record: MetadataRecord,
    pub degraded: bool,
}

/// AI provider seam for the Process step.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Extract structured metadata from the combined document text.
    /// Never fails; trouble yields a defaulted record marked degraded.
    async fn extract_metadata(&self, full_text: &str) -> MetadataExtraction;

    /// Generate an embedding for the combined document text.
    /// `None` on any failure.
    async fn generate_embedding(&self, text: &str) -> Option<Vec<f32>>;
}

// --- OpenAI implementation ---

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// [`AiGateway`] backed by the OpenAI API.
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: AiConfig,
}

impl OpenAiGateway {
    pub fn new(config: AiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn api_base(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
    }

    async fn try_extract_metadata(&self, full_text: &str) -> AppResult<MetadataRecord> {
        let request = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: EXTRACTION_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("{}{}", EXTRACTION_PROMPT_HEADER, full_text),
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base()))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::extraction(format!("Chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::extraction(format!(
                "Chat API returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::extraction(format!("Invalid chat response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::extraction("Chat response contained no content"))?;

        parse_metadata_response(&content)
    }

    async fn try_generate_embedding(&self, text: &str) -> AppResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.config.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base()))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::extraction(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::extraction(format!(
                "Embedding API returned {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::extraction(format!("Invalid embedding response: {}", e)))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AppError::extraction("Embedding response contained no data"))
    }
}

#[async_trait]
impl AiGateway for OpenAiGateway {
    async fn extract_metadata(&self, full_text: &str) -> MetadataExtraction {
        match self.try_extract_metadata(full_text).await {
            Ok(record) => MetadataExtraction {
                record,
                degraded: false,
            },
            Err(e) => {
                warn!("metadata extraction degraded: {}", e);
                MetadataExtraction {
                    record: MetadataRecord::default(),
                    degraded: true,
                }
            }
        }
    }

    async fn generate_embedding(&self, text: &str) -> Option<Vec<f32>> {
        match self.try_generate_embedding(text).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!("embedding generation failed: {}", e);
                None
            }
        }
    }
}

/// Parse the model's reply into a metadata record, unwrapping an optional
/// ``` / ```json code fence first.
pub fn parse_metadata_response(content: &str) -> AppResult<MetadataRecord> {
    let json_text = strip_code_fence(content);
    serde_json::from_str(json_text)
        .map_err(|e| AppError::extraction(format!("Metadata JSON parse failed: {}", e)))
}

/// Strip a leading ```json or ``` fence and the trailing ``` if present.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
