//! Metadata Record
//!
//! Structured project facts extracted from brief/kick-off text. Field names
//! match the JSON structure the extraction prompt requests, so the model
//! response deserializes directly. Every field defaults to empty/false, so
//! a partial or failed extraction still yields a renderable record.

use serde::{Deserialize, Serialize};

/// Project metadata extracted from the uploaded documents.
///
/// Overwritten wholesale when the user submits the review form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataRecord {
    /// Study type (e.g. U&A, brand health).
    pub tipo_estudio: String,
    /// Project name.
    pub nombre_proyecto: String,
    /// Brand / client.
    pub marca: String,
    /// Industry.
    pub industria: String,
    /// General research objective.
    pub objetivo_general: String,
    /// Business questions, verbatim from the documents.
    pub preguntas_negocio: Vec<String>,
    /// Decisions the client intends to make with the results.
    pub decisiones_a_tomar: String,
    /// Target audience description.
    pub target: String,
    /// Planned sample size.
    pub muestra_planificada: String,
    /// Hypotheses stated in the documents.
    pub hipotesis: String,
    /// Context-only excerpt of the raw text (first 500 characters).
    pub texto_preview: String,
    /// Link to the source file, if any.
    pub archivo_link: String,
    /// Quality control: evidence of a client brief in the text.
    pub tiene_brief: bool,
    /// Quality control: evidence of a kick-off document in the text.
    pub tiene_kickoff: bool,
}
