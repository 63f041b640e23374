//! Spreadsheet export verified by reading the workbook back.

use std::io::Cursor;

use calamine::{open_workbook, Reader, Xlsx};

use questgen::services::excel::{self, EXPORT_COLUMNS};
use questgen::QuestionnaireDocument;

use crate::fakes::orion_questionnaire_json;

fn orion_document() -> QuestionnaireDocument {
    serde_json::from_value(orion_questionnaire_json()).unwrap()
}

#[test]
fn test_exported_workbook_has_header_and_question_rows() {
    let doc = orion_document();
    let bytes = excel::to_xlsx_bytes(&doc).unwrap();

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("Preguntas").unwrap();

    assert_eq!(range.height(), doc.questions.len() + 1);
    assert_eq!(range.width(), 7);

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    assert_eq!(rows[0], EXPORT_COLUMNS);
    assert_eq!(rows[1][0], "Awareness");
    assert_eq!(rows[1][1], "P1");
    assert_eq!(rows[1][4], "Acme, Globex, Initech");
    assert_eq!(rows[4][3], "Abierta");
}

#[test]
fn test_exported_workbook_round_trips_fenced_webhook_text() {
    let fenced = format!("```json\n{}\n```", orion_questionnaire_json());
    let doc = excel::load_document(&fenced).unwrap();
    let bytes = excel::to_xlsx_bytes(&doc).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let now = chrono::Local::now().naive_local();
    let path = dir.path().join(excel::export_file_name(&doc, now));
    std::fs::write(&path, bytes).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let range = workbook.worksheet_range("Preguntas").unwrap();
    assert_eq!(range.height(), 5);
}

#[test]
fn test_download_content_type_is_the_standard_spreadsheet_mime() {
    assert_eq!(
        excel::XLSX_MIME,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}

#[test]
fn test_export_file_name_uses_document_stem_and_timestamp() {
    let doc = orion_document();
    let now = chrono::NaiveDate::from_ymd_opt(2026, 8, 23)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap();
    assert_eq!(
        excel::export_file_name(&doc, now),
        "cuestionario_orion_ua_20260823_1430.xlsx"
    );
}
