//! questgen
//!
//! Turns market-research briefs and kick-off documents into a generated
//! questionnaire delivered as an xlsx spreadsheet. A six-step wizard session
//! is the API surface: upload documents, process them (text extraction,
//! metadata extraction, embedding), review the metadata, generate the
//! questionnaire through an external webhook, edit the question grid, and
//! export the spreadsheet.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{AiConfig, AppConfig, WebhookConfig};
pub use models::{MetadataRecord, Question, QuestionRow, QuestionnaireDocument};
pub use services::{
    AiGateway, GenerationReply, MakeWebhookClient, OpenAiGateway, QuestionnaireGateway,
    UploadedDocument, WizardSession, WizardStep,
};
pub use utils::error::{AppError, AppResult};
