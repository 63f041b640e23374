//! Service layer

pub mod ai;
pub mod document;
pub mod excel;
pub mod webhook;
pub mod wizard;

pub use ai::{AiGateway, MetadataExtraction, OpenAiGateway};
pub use document::UploadedDocument;
pub use webhook::{GenerationReply, MakeWebhookClient, QuestionnaireGateway};
pub use wizard::{WizardSession, WizardStep};
