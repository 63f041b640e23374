//! Wizard State Machine
//!
//! Drives the six-step flow from uploaded documents to a downloadable
//! spreadsheet. `WizardSession` owns all per-run state; step actions
//! validate the current step, perform their work, and only then mutate the
//! session, so a failed action always leaves the session as it found it.

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::models::{MetadataRecord, QuestionRow, QuestionnaireDocument};
use crate::services::ai::AiGateway;
use crate::services::document::{combine_texts, extract_text, UploadedDocument};
use crate::services::excel::load_document;
use crate::services::webhook::QuestionnaireGateway;
use crate::utils::error::{AppError, AppResult};

/// Length of the context excerpt kept in `texto_preview`.
const TEXT_PREVIEW_CHARS: usize = 500;

/// The six wizard steps, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    Upload,
    Process,
    ReviewMetadata,
    Generate,
    Edit,
    Download,
}

impl WizardStep {
    /// 1-based step number shown in the progress indicator.
    pub fn number(&self) -> u8 {
        match self {
            Self::Upload => 1,
            Self::Process => 2,
            Self::ReviewMetadata => 3,
            Self::Generate => 4,
            Self::Edit => 5,
            Self::Download => 6,
        }
    }

    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Upload => "Cargar",
            Self::Process => "Procesar",
            Self::ReviewMetadata => "Revisar",
            Self::Generate => "Generar",
            Self::Edit => "Editar",
            Self::Download => "Descargar",
        }
    }
}

/// One user's run through the wizard.
#[derive(Default)]
pub struct WizardSession {
    step: WizardStep,
    documents: Vec<UploadedDocument>,
    full_text: String,
    /// Idempotency flag for the Process step; set only after extraction,
    /// metadata and embedding have all completed.
    processed: bool,
    metadata: MetadataRecord,
    /// True when metadata extraction failed and the record is the default.
    metadata_degraded: bool,
    embedding: Option<Vec<f32>>,
    questionnaire: Option<QuestionnaireDocument>,
    processing_id: Option<String>,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    // --- read accessors ---

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn documents(&self) -> &[UploadedDocument] {
        &self.documents
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn metadata(&self) -> &MetadataRecord {
        &self.metadata
    }

    pub fn metadata_degraded(&self) -> bool {
        self.metadata_degraded
    }

    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    pub fn questionnaire(&self) -> Option<&QuestionnaireDocument> {
        self.questionnaire.as_ref()
    }

    pub fn processing_id(&self) -> Option<&str> {
        self.processing_id.as_deref()
    }

    /// First 500 characters of the combined text, for the summary panel.
    pub fn text_preview(&self) -> String {
        self.full_text.chars().take(TEXT_PREVIEW_CHARS).collect()
    }

    /// Current question count, 0 when no questionnaire exists yet.
    pub fn question_count(&self) -> usize {
        self.questionnaire
            .as_ref()
            .map(|doc| doc.questions.len())
            .unwrap_or(0)
    }

    // --- step actions ---

    /// Step 1: attach the uploaded documents and advance to Process.
    pub fn attach_documents(&mut self, documents: Vec<UploadedDocument>) -> AppResult<()> {
        self.require_step(WizardStep::Upload, "attach_documents")?;
        if documents.is_empty() {
            return Err(AppError::state("At least one document is required"));
        }
        self.documents = documents;
        self.step = WizardStep::Process;
        Ok(())
    }

    /// Step 2: run extraction, metadata and embedding once.
    ///
    /// Idempotent; re-entering the Process step does not re-run the AI
    /// calls. Text extraction failure propagates and leaves the session
    /// untouched so the step can be re-attempted; metadata and embedding
    /// failures degrade instead of failing.
    pub async fn ensure_processed(&mut self, gateway: &dyn AiGateway) -> AppResult<()> {
        self.require_step(WizardStep::Process, "ensure_processed")?;
        if self.processed {
            return Ok(());
        }

        let texts = self
            .documents
            .iter()
            .map(|doc| extract_text(&doc.data, &doc.mime_type))
            .collect::<AppResult<Vec<_>>>()?;
        let full_text = combine_texts(&texts);

        let extraction = gateway.extract_metadata(&full_text).await;
        let embedding = gateway.generate_embedding(&full_text).await;

        info!(
            chars = full_text.len(),
            degraded = extraction.degraded,
            has_embedding = embedding.is_some(),
            "documents processed"
        );

        self.full_text = full_text;
        self.metadata = extraction.record;
        self.metadata_degraded = extraction.degraded;
        self.embedding = embedding;
        self.processed = true;
        Ok(())
    }

    /// Step 2 → 3, once processing has completed.
    pub fn confirm_processing(&mut self) -> AppResult<()> {
        self.require_step(WizardStep::Process, "confirm_processing")?;
        if !self.processed {
            return Err(AppError::state("Documents have not been processed yet"));
        }
        self.step = WizardStep::ReviewMetadata;
        Ok(())
    }

    /// Step 3 → 2. Processing stays done; going back does not re-run it.
    pub fn back_to_process(&mut self) -> AppResult<()> {
        self.require_step(WizardStep::ReviewMetadata, "back_to_process")?;
        self.step = WizardStep::Process;
        Ok(())
    }

    /// Step 3: replace the record wholesale with the reviewed form and
    /// advance to Generate. `texto_preview` is re-derived from the combined
    /// text and `archivo_link` is cleared; the form does not edit either.
    pub fn submit_metadata(&mut self, form: MetadataRecord) -> AppResult<()> {
        self.require_step(WizardStep::ReviewMetadata, "submit_metadata")?;
        let mut record = form;
        record.texto_preview = self.text_preview();
        record.archivo_link = String::new();
        self.metadata = record;
        self.metadata_degraded = false;
        self.step = WizardStep::Generate;
        Ok(())
    }

    /// Step 4 → 3.
    pub fn back_to_review(&mut self) -> AppResult<()> {
        self.require_step(WizardStep::Generate, "back_to_review")?;
        self.step = WizardStep::ReviewMetadata;
        Ok(())
    }

    /// Step 4: call the generation webhook and load the questionnaire.
    ///
    /// A fresh correlation id is minted per attempt. Transport or parse
    /// failure propagates and leaves the session unchanged, so the user can
    /// retry or go back.
    pub async fn generate(&mut self, gateway: &dyn QuestionnaireGateway) -> AppResult<()> {
        self.require_step(WizardStep::Generate, "generate")?;

        let processing_id = format!("quest_{}", Uuid::new_v4().simple());
        let reply = gateway
            .generate(self.embedding.as_deref(), &self.metadata, &processing_id)
            .await?;

        let mut document = load_document(&reply.canonical_text())?;
        if document.metadata == Value::Null {
            document.sync_total_questions();
        }

        info!(
            %processing_id,
            questions = document.questions.len(),
            "questionnaire generated"
        );

        self.processing_id = Some(processing_id);
        self.questionnaire = Some(document);
        Ok(())
    }

    /// Step 4 → 5, once a questionnaire exists.
    pub fn confirm_generation(&mut self) -> AppResult<()> {
        self.require_step(WizardStep::Generate, "confirm_generation")?;
        if self.questionnaire.is_none() {
            return Err(AppError::state("No questionnaire has been generated yet"));
        }
        self.step = WizardStep::Edit;
        Ok(())
    }

    /// Step 5: replace the question list with the edited grid rows and
    /// update the `totalQuestions` count.
    pub fn save_grid(&mut self, rows: Vec<QuestionRow>) -> AppResult<()> {
        self.require_step(WizardStep::Edit, "save_grid")?;
        let document = self
            .questionnaire
            .as_mut()
            .ok_or_else(|| AppError::state("No questionnaire to edit"))?;
        document.questions = rows.into_iter().map(QuestionRow::into_question).collect();
        document.sync_total_questions();
        Ok(())
    }

    /// Step 5 → 4.
    pub fn back_to_generate(&mut self) -> AppResult<()> {
        self.require_step(WizardStep::Edit, "back_to_generate")?;
        self.step = WizardStep::Generate;
        Ok(())
    }

    /// Step 5 → 6.
    pub fn finish_editing(&mut self) -> AppResult<()> {
        self.require_step(WizardStep::Edit, "finish_editing")?;
        if self.questionnaire.is_none() {
            return Err(AppError::state("No questionnaire to download"));
        }
        self.step = WizardStep::Download;
        Ok(())
    }

    /// Step 6 → 5.
    pub fn back_to_editor(&mut self) -> AppResult<()> {
        self.require_step(WizardStep::Download, "back_to_editor")?;
        self.step = WizardStep::Edit;
        Ok(())
    }

    /// Discard everything and start over at Upload. Valid from any step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn require_step(&self, expected: WizardStep, action: &str) -> AppResult<()> {
        if self.step != expected {
            return Err(AppError::state(format!(
                "{} requires step {} ({}), current step is {} ({})",
                action,
                expected.number(),
                expected.label(),
                self.step.number(),
                self.step.label()
            )));
        }
        Ok(())
    }
}
