//! Data models

pub mod metadata;
pub mod questionnaire;

pub use metadata::MetadataRecord;
pub use questionnaire::{
    Question, QuestionRow, QuestionnaireDocument, GRID_OPTIONS_SEPARATOR, OPTIONS_CRLF,
    RESPONSE_TYPES,
};
