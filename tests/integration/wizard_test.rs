//! Full wizard runs against the fake gateways.

use questgen::services::document::TXT_MIME;
use questgen::{
    AppError, MetadataRecord, QuestionRow, UploadedDocument, WizardSession, WizardStep,
};

use crate::fakes::{OrionAi, OrionWebhook};

const ORION_BRIEF: &str = "Project Orion: estudio U&A para Acme en la categoría CPG. \
El cliente quiere entender hábitos de consumo y quién compra la categoría.";

fn orion_upload() -> Vec<UploadedDocument> {
    vec![UploadedDocument::new(
        "brief_orion.txt",
        TXT_MIME,
        ORION_BRIEF.as_bytes().to_vec(),
    )]
}

async fn run_until_edit(session: &mut WizardSession, with_embedding: bool) {
    session.attach_documents(orion_upload()).unwrap();
    session
        .ensure_processed(&OrionAi { with_embedding })
        .await
        .unwrap();
    session.confirm_processing().unwrap();
    session.submit_metadata(session.metadata().clone()).unwrap();
    session
        .generate(&OrionWebhook {
            fail: false,
            expect_embedding: with_embedding,
        })
        .await
        .unwrap();
    session.confirm_generation().unwrap();
}

#[tokio::test]
async fn test_full_run_produces_a_downloadable_questionnaire() {
    let mut session = WizardSession::new();
    run_until_edit(&mut session, true).await;

    assert_eq!(session.step(), WizardStep::Edit);
    assert_eq!(session.question_count(), 4);
    assert_eq!(session.metadata().nombre_proyecto, "Project Orion");
    assert!(session.metadata().texto_preview.starts_with("Project Orion"));

    session.finish_editing().unwrap();
    assert_eq!(session.step(), WizardStep::Download);
    let doc = session.questionnaire().unwrap();
    assert_eq!(doc.file_name(), Some("orion_ua"));
    assert_eq!(doc.total_questions(), Some(4));
}

#[tokio::test]
async fn test_wizard_continues_without_an_embedding() {
    let mut session = WizardSession::new();
    run_until_edit(&mut session, false).await;

    assert!(session.embedding().is_none());
    assert_eq!(session.question_count(), 4);
}

#[tokio::test]
async fn test_generation_failure_leaves_questionnaire_absent() {
    let mut session = WizardSession::new();
    session.attach_documents(orion_upload()).unwrap();
    session
        .ensure_processed(&OrionAi { with_embedding: true })
        .await
        .unwrap();
    session.confirm_processing().unwrap();
    session.submit_metadata(session.metadata().clone()).unwrap();

    let err = session
        .generate(&OrionWebhook {
            fail: true,
            expect_embedding: true,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Generation(_)));
    assert!(session.questionnaire().is_none());
    assert_eq!(session.step(), WizardStep::Generate);

    // Retrying on the same step succeeds.
    session
        .generate(&OrionWebhook {
            fail: false,
            expect_embedding: true,
        })
        .await
        .unwrap();
    session.confirm_generation().unwrap();
    assert_eq!(session.question_count(), 4);
}

#[tokio::test]
async fn test_grid_edit_adding_a_row_bumps_total_questions() {
    let mut session = WizardSession::new();
    run_until_edit(&mut session, true).await;

    let mut rows: Vec<QuestionRow> = session
        .questionnaire()
        .unwrap()
        .questions
        .iter()
        .map(|q| q.to_row())
        .collect();
    assert_eq!(rows[0].opciones, "Acme | Globex | Initech");

    rows.push(QuestionRow {
        id: "P5".to_string(),
        modulo: "NPS".to_string(),
        texto: "¿Recomendaría la marca?".to_string(),
        tipo: "Única (Escala)".to_string(),
        opciones: "0 | 1 | 2".to_string(),
        indicador: "NPS".to_string(),
        logica: String::new(),
    });
    session.save_grid(rows).unwrap();

    let doc = session.questionnaire().unwrap();
    assert_eq!(doc.total_questions(), Some(5));
    let added = &doc.questions[4];
    assert_eq!(added.numero, "P5");
    assert_eq!(added.opciones, "0\r\n1\r\n2");
    // The webhook's own metadata members survive the edit.
    assert_eq!(doc.file_name(), Some("orion_ua"));
}

#[tokio::test]
async fn test_reviewed_metadata_replaces_the_extracted_record() {
    let mut session = WizardSession::new();
    session.attach_documents(orion_upload()).unwrap();
    session
        .ensure_processed(&OrionAi { with_embedding: true })
        .await
        .unwrap();
    session.confirm_processing().unwrap();

    let reviewed = MetadataRecord {
        nombre_proyecto: "Project Orion".to_string(),
        marca: "Acme Corp".to_string(),
        muestra_planificada: "400".to_string(),
        ..session.metadata().clone()
    };
    session.submit_metadata(reviewed).unwrap();

    assert_eq!(session.metadata().marca, "Acme Corp");
    assert_eq!(session.metadata().muestra_planificada, "400");
    assert_eq!(session.metadata().texto_preview, session.text_preview());
}
