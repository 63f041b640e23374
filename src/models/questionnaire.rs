//! Questionnaire Document
//!
//! The generated questionnaire: free-form document metadata plus an ordered
//! list of questions. Question fields keep the upstream JSON keys so the
//! webhook response deserializes directly; the edit grid works on a flat
//! row projection with a human-readable options delimiter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options delimiter inside a stored question (one option per line).
pub const OPTIONS_CRLF: &str = "\r\n";

/// Options delimiter shown in the edit grid.
pub const GRID_OPTIONS_SEPARATOR: &str = " | ";

/// Closed set of response types offered by the edit grid's type selector.
///
/// The generation webhook is not restricted to this set; out-of-set values
/// are preserved as-is.
pub const RESPONSE_TYPES: [&str; 9] = [
    "Única",
    "Múltiple",
    "Abierta",
    "Matriz de opción única por fila",
    "Ranking",
    "Numérica Abierta / Slider",
    "Texto/Imagen",
    "Única (Escala)",
    "Heat map / Image Highlighter",
];

/// A single survey question as produced by the generation webhook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    /// Display key in the edit grid; not required to be unique or ordered.
    #[serde(rename = "No. Pregunta")]
    pub numero: String,
    #[serde(rename = "KPI base o Modulo")]
    pub modulo: String,
    #[serde(rename = "Pregunta")]
    pub texto: String,
    #[serde(rename = "Tipo de respuesta")]
    pub tipo: String,
    /// Response options, CRLF-delimited.
    #[serde(rename = "Opciones de respuesta")]
    pub opciones: String,
    #[serde(rename = "Indicador")]
    pub indicador: String,
    #[serde(rename = "Lógica de programación")]
    pub logica: String,
}

impl Question {
    /// Project this question into its edit-grid row, swapping the CRLF
    /// options delimiter for the grid's `" | "` separator.
    pub fn to_row(&self) -> QuestionRow {
        QuestionRow {
            id: self.numero.clone(),
            modulo: self.modulo.clone(),
            texto: self.texto.clone(),
            tipo: self.tipo.clone(),
            opciones: self.opciones.replace(OPTIONS_CRLF, GRID_OPTIONS_SEPARATOR),
            indicador: self.indicador.clone(),
            logica: self.logica.clone(),
        }
    }
}

/// The edit-grid projection of a [`Question`]: same seven fields, options
/// rendered with `" | "` instead of CRLF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionRow {
    pub id: String,
    pub modulo: String,
    pub texto: String,
    pub tipo: String,
    pub opciones: String,
    pub indicador: String,
    pub logica: String,
}

impl QuestionRow {
    /// Convert the row back into a stored question, restoring the CRLF
    /// options delimiter. Inverse of [`Question::to_row`].
    pub fn into_question(self) -> Question {
        Question {
            numero: self.id,
            modulo: self.modulo,
            texto: self.texto,
            tipo: self.tipo,
            opciones: self.opciones.replace(GRID_OPTIONS_SEPARATOR, OPTIONS_CRLF),
            indicador: self.indicador,
            logica: self.logica,
        }
    }
}

/// The full questionnaire: free-form metadata plus the question list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireDocument {
    /// Free-form document metadata. Carries at least a `fileName` member
    /// and a `totalQuestions` count when produced by the webhook.
    pub metadata: Value,
    pub questions: Vec<Question>,
}

impl QuestionnaireDocument {
    /// The `fileName` member of the document metadata, if present.
    pub fn file_name(&self) -> Option<&str> {
        self.metadata.get("fileName").and_then(Value::as_str)
    }

    /// Update `metadata.totalQuestions` to the current question count,
    /// creating the metadata object if the webhook omitted it.
    pub fn sync_total_questions(&mut self) {
        if !self.metadata.is_object() {
            self.metadata = Value::Object(serde_json::Map::new());
        }
        if let Value::Object(map) = &mut self.metadata {
            map.insert(
                "totalQuestions".to_string(),
                Value::from(self.questions.len()),
            );
        }
    }

    /// The `totalQuestions` member of the document metadata, if present.
    pub fn total_questions(&self) -> Option<u64> {
        self.metadata.get("totalQuestions").and_then(Value::as_u64)
    }
}
