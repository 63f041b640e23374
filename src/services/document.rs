//! Document Text Extraction
//!
//! Extracts plain text from uploaded brief/kick-off documents. Exactly three
//! declared MIME types are recognized (DOCX, PDF, plain text); anything else
//! fails with an unsupported-type error. Extraction is synchronous and
//! operates on in-memory blobs.

use std::io::Cursor;

use crate::utils::error::{AppError, AppResult};

/// DOCX MIME type.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// PDF MIME type.
pub const PDF_MIME: &str = "application/pdf";

/// Plain text MIME type.
pub const TXT_MIME: &str = "text/plain";

/// An uploaded document blob with its declared type.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Original file name, for display only.
    pub name: String,
    /// Declared MIME type; drives reader dispatch.
    pub mime_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Extract plain text from a document blob according to its declared type.
pub fn extract_text(data: &[u8], mime_type: &str) -> AppResult<String> {
    match mime_type {
        DOCX_MIME => extract_from_docx(data),
        PDF_MIME => extract_from_pdf(data),
        TXT_MIME => extract_from_txt(data),
        other => Err(AppError::unsupported_file_type(other)),
    }
}

/// Concatenate the extracted texts of several documents, in upload order,
/// with a single newline between them.
pub fn combine_texts(texts: &[String]) -> String {
    texts.join("\n")
}

/// Extract text from a DOCX blob by walking `<w:t>` runs inside the
/// `word/document.xml` entry, one line per `<w:p>` paragraph. Empty
/// paragraphs contribute empty lines; no trimming is applied.
fn extract_from_docx(data: &[u8]) -> AppResult<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| AppError::extraction(format!("Failed to read DOCX as ZIP: {}", e)))?;

    let mut doc_xml = String::new();
    {
        let mut doc_entry = archive
            .by_name("word/document.xml")
            .map_err(|_| AppError::extraction("Invalid DOCX: missing word/document.xml"))?;
        std::io::Read::read_to_string(&mut doc_entry, &mut doc_xml)
            .map_err(|e| AppError::extraction(format!("Failed to read document.xml: {}", e)))?;
    }

    let mut reader = quick_xml::Reader::from_str(&doc_xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph_text = String::new();
    let mut in_paragraph = false;
    let mut in_text_element = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(ref e))
            | Ok(quick_xml::events::Event::Empty(ref e)) => {
                let local_name = e.local_name();
                let name = std::str::from_utf8(local_name.as_ref()).unwrap_or("");
                if name == "p" {
                    in_paragraph = true;
                    paragraph_text.clear();
                } else if name == "t" {
                    in_text_element = true;
                }
            }
            Ok(quick_xml::events::Event::End(ref e)) => {
                let local_name = e.local_name();
                let name = std::str::from_utf8(local_name.as_ref()).unwrap_or("");
                if name == "p" {
                    if in_paragraph {
                        paragraphs.push(paragraph_text.clone());
                    }
                    in_paragraph = false;
                } else if name == "t" {
                    in_text_element = false;
                }
            }
            Ok(quick_xml::events::Event::Text(ref e)) => {
                if in_text_element {
                    if let Ok(text) = e.unescape() {
                        paragraph_text.push_str(&text);
                    }
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(AppError::extraction(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

/// Extract text from a PDF blob. Pages are concatenated in document order;
/// a page that yields no text contributes an empty string.
fn extract_from_pdf(data: &[u8]) -> AppResult<String> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| AppError::extraction(format!("Failed to extract PDF text: {}", e)))?;

    // pdf-extract separates pages with form feeds; joining the pages back
    // together matches the page-by-page concatenation of the PDF reader.
    Ok(text.split('\x0c').collect::<Vec<_>>().join(""))
}

/// Decode a plain-text blob as UTF-8.
fn extract_from_txt(data: &[u8]) -> AppResult<String> {
    String::from_utf8(data.to_vec())
        .map_err(|e| AppError::extraction(format!("Invalid UTF-8 in text file: {}", e)))
}
