//! Text extraction from uploaded documents.
//!
//! Supported formats are decided by filename extension: `.txt` (encoding
//! sniffed, UTF-8 fallback), `.pdf`, and `.docx`. Anything else is rejected
//! up front with [`ExtractError::UnsupportedType`]; legacy `.doc` files are
//! deliberately not supported.

pub mod error;


pub use error::ExtractError;

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;

/// Format detected from the uploaded filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedType {
    Text,
    Pdf,
    Docx,
}

impl DetectedType {
    /// Lowercase tag used in API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedType::Text => "text",
            DetectedType::Pdf => "pdf",
            DetectedType::Docx => "docx",
        }
    }
}

/// Extracts text from an uploaded document.
///
/// Returns the raw extracted text (callers normalize it) and the detected
/// format.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<(String, DetectedType), ExtractError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => Ok((read_txt(bytes), DetectedType::Text)),
        "pdf" => Ok((read_pdf(bytes, filename)?, DetectedType::Pdf)),
        "docx" => Ok((read_docx(bytes, filename)?, DetectedType::Docx)),
        _ => Err(ExtractError::UnsupportedType {
            extension: if extension.is_empty() {
                String::new()
            } else {
                format!(".{extension}")
            },
        }),
    }
}

/// Decodes plain text, sniffing the encoding with a UTF-8 bias.
fn read_txt(bytes: &[u8]) -> String {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn read_pdf(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map(|text| text.trim().to_string())
        .map_err(|e| ExtractError::Extraction {
            filename: filename.to_string(),
            message: e.to_string(),
        })
}

/// Pulls the text runs out of the main document part of a `.docx` archive,
/// with a newline per paragraph.
fn read_docx(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    let extraction_err = |message: String| ExtractError::Extraction {
        filename: filename.to_string(),
        message,
    };

    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| extraction_err(e.to_string()))?;

    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| extraction_err(e.to_string()))?
        .read_to_string(&mut document)
        .map_err(|e| extraction_err(e.to_string()))?;

    let mut reader = quick_xml::Reader::from_str(&document);
    let mut out = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(text)) => {
                let unescaped = text.unescape().map_err(|e| extraction_err(e.to_string()))?;
                out.push_str(&unescaped);
            }
            Ok(Event::End(end)) if end.name().as_ref() == b"w:p" => out.push('\n'),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(extraction_err(e.to_string())),
        }
    }

    Ok(out.trim().to_string())
}
