//! Spreadsheet Converter
//!
//! Leniently loads the questionnaire JSON the webhook produced and renders
//! it as an `.xlsx` workbook: one `Preguntas` sheet, one row per question,
//! column widths fitted to content.

use chrono::NaiveDateTime;
use regex::Regex;
use rust_xlsxwriter::Workbook;

use crate::models::{Question, QuestionnaireDocument, OPTIONS_CRLF};
use crate::utils::error::{AppError, AppResult};

/// Standard xlsx content type.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Spreadsheet header, in column order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "modulo",
    "id",
    "texto",
    "tipo",
    "opciones",
    "indicador",
    "logica",
];

/// Options delimiter in the exported sheet.
pub const EXPORT_OPTIONS_SEPARATOR: &str = ", ";

const SHEET_NAME: &str = "Preguntas";
const MAX_COLUMN_WIDTH: usize = 50;

/// Matches a fenced code block, optionally tagged `json`, lazily so only
/// the first block is taken.
const FENCE_PATTERN: &str = r"(?is)```(?:json)?\s*(.*?)\s*```";

/// Parse questionnaire JSON, tolerating a fenced code block around it.
///
/// Direct parse first; on failure the first fenced block is extracted and
/// parsed instead. Both failing is a document parse error carrying the
/// second parser's diagnostic.
pub fn load_document(content: &str) -> AppResult<QuestionnaireDocument> {
    let trimmed = content.trim();
    match serde_json::from_str(trimmed) {
        Ok(doc) => Ok(doc),
        Err(_) => {
            let cleaned = clean_json_content(trimmed)?;
            serde_json::from_str(cleaned)
                .map_err(|e| AppError::document_parse(format!("Invalid JSON: {}", e)))
        }
    }
}

/// Unwrap the first fenced code block if present; otherwise return the
/// input unchanged.
fn clean_json_content(content: &str) -> AppResult<&str> {
    let fence = Regex::new(FENCE_PATTERN)
        .map_err(|e| AppError::document_parse(format!("Fence pattern failed: {}", e)))?;
    Ok(fence
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(content))
}

/// Project questions into export rows, in [`EXPORT_COLUMNS`] order. Options
/// lose their CRLF delimiters in favor of `", "`.
pub fn to_export_rows(questions: &[Question]) -> Vec<[String; 7]> {
    questions
        .iter()
        .map(|q| {
            [
                q.modulo.clone(),
                q.numero.clone(),
                q.texto.clone(),
                q.tipo.clone(),
                q.opciones
                    .replace(OPTIONS_CRLF, EXPORT_OPTIONS_SEPARATOR)
                    .trim()
                    .to_string(),
                q.indicador.clone(),
                q.logica.clone(),
            ]
        })
        .collect()
}

/// Render the questionnaire as xlsx bytes.
///
/// Fails when the document has no questions. Each column is sized to its
/// longest cell (header included) plus two characters, capped at 50.
pub fn to_xlsx_bytes(document: &QuestionnaireDocument) -> AppResult<Vec<u8>> {
    if document.questions.is_empty() {
        return Err(AppError::export("Questionnaire has no questions"));
    }

    let rows = to_export_rows(&document.questions);

    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .map_err(|e| AppError::export(format!("Worksheet setup failed: {}", e)))?;

    for (col, header) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| AppError::export(format!("Header write failed: {}", e)))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32 + 1, col as u16, cell)
                .map_err(|e| AppError::export(format!("Cell write failed: {}", e)))?;
        }
    }

    for (col, header) in EXPORT_COLUMNS.iter().enumerate() {
        let longest = rows
            .iter()
            .map(|row| row[col].chars().count())
            .chain(std::iter::once(header.chars().count()))
            .max()
            .unwrap_or(0);
        let width = (longest + 2).min(MAX_COLUMN_WIDTH);
        worksheet
            .set_column_width(col as u16, width as f64)
            .map_err(|e| AppError::export(format!("Column sizing failed: {}", e)))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::export(format!("Workbook save failed: {}", e)))
}

/// Download filename: `cuestionario_<fileName>_<YYYYMMDD_HHMM>.xlsx`, with
/// `generated` as the stem when the document metadata names no file.
pub fn export_file_name(document: &QuestionnaireDocument, now: NaiveDateTime) -> String {
    let stem = document.file_name().unwrap_or("generated");
    format!(
        "cuestionario_{}_{}.xlsx",
        stem,
        now.format("%Y%m%d_%H%M")
    )
}
