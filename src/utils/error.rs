//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A declared file type outside the supported set (DOCX, PDF, TXT)
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Document text extraction errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Questionnaire generation transport errors (webhook call)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Questionnaire JSON could not be parsed, even leniently
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    /// Spreadsheet export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// An action invoked at the wrong wizard step
    #[error("Wizard state error: {0}")]
    State(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an unsupported-file-type error
    pub fn unsupported_file_type(mime: impl Into<String>) -> Self {
        Self::UnsupportedFileType(mime.into())
    }

    /// Create an extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Create a document parse error
    pub fn document_parse(msg: impl Into<String>) -> Self {
        Self::DocumentParse(msg.into())
    }

    /// Create an export error
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a wizard state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }
}

/// Convert AppError to a string suitable for UI-facing responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
