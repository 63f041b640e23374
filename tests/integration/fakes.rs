//! In-memory gateway fakes shared by the integration tests.

use async_trait::async_trait;
use serde_json::json;

use questgen::services::ai::MetadataExtraction;
use questgen::{AiGateway, AppError, AppResult, GenerationReply, MetadataRecord, QuestionnaireGateway};

/// AI gateway that answers the "Project Orion" scenario.
pub struct OrionAi {
    pub with_embedding: bool,
}

#[async_trait]
impl AiGateway for OrionAi {
    async fn extract_metadata(&self, full_text: &str) -> MetadataExtraction {
        assert!(full_text.contains("Project Orion"));
        MetadataExtraction {
            record: MetadataRecord {
                tipo_estudio: "U&A".to_string(),
                nombre_proyecto: "Project Orion".to_string(),
                marca: "Acme".to_string(),
                industria: "CPG".to_string(),
                objetivo_general: "Entender hábitos de consumo".to_string(),
                preguntas_negocio: vec!["¿Quién compra la categoría?".to_string()],
                tiene_brief: true,
                ..Default::default()
            },
            degraded: false,
        }
    }

    async fn generate_embedding(&self, _text: &str) -> Option<Vec<f32>> {
        if self.with_embedding {
            Some(vec![0.25; 8])
        } else {
            None
        }
    }
}

/// Webhook fake that records what it was sent and replies with a fixed
/// four-question document, or fails when `fail` is set.
pub struct OrionWebhook {
    pub fail: bool,
    pub expect_embedding: bool,
}

#[async_trait]
impl QuestionnaireGateway for OrionWebhook {
    async fn generate(
        &self,
        embedding: Option<&[f32]>,
        metadata: &MetadataRecord,
        processing_id: &str,
    ) -> AppResult<GenerationReply> {
        if self.fail {
            return Err(AppError::generation("operation timed out"));
        }
        assert_eq!(embedding.is_some(), self.expect_embedding);
        assert_eq!(metadata.nombre_proyecto, "Project Orion");
        assert!(processing_id.starts_with("quest_"));

        Ok(GenerationReply::Structured(orion_questionnaire_json()))
    }
}

pub fn orion_questionnaire_json() -> serde_json::Value {
    json!({
        "metadata": {"fileName": "orion_ua", "totalQuestions": 4},
        "questions": [
            question("P1", "Awareness", "¿Qué marcas de la categoría conoce?",
                     "Múltiple", "Acme\r\nGlobex\r\nInitech", "TOM"),
            question("P2", "Uso", "¿Con qué frecuencia consume la categoría?",
                     "Única", "Diario\r\nSemanal\r\nMensual", "Frecuencia"),
            question("P3", "Imagen", "Califique cada marca en calidad",
                     "Matriz de opción única por fila", "Acme\r\nGlobex", "Imagen"),
            question("P4", "Cierre", "¿Algo más que quiera comentar?",
                     "Abierta", "", ""),
        ]
    })
}

fn question(
    id: &str,
    modulo: &str,
    texto: &str,
    tipo: &str,
    opciones: &str,
    indicador: &str,
) -> serde_json::Value {
    json!({
        "No. Pregunta": id,
        "KPI base o Modulo": modulo,
        "Pregunta": texto,
        "Tipo de respuesta": tipo,
        "Opciones de respuesta": opciones,
        "Indicador": indicador,
        "Lógica de programación": "Mostrar a todos"
    })
}
