use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by document text extraction.
pub enum ExtractError {
    /// The filename's extension is not one of the supported formats.
    #[error("unsupported file type '{extension}'. Supported: .docx, .pdf, .txt")]
    UnsupportedType {
        /// The offending extension (with leading dot, may be empty).
        extension: String,
    },

    /// The file matched a supported format but could not be read.
    #[error("failed to extract text from '{filename}': {message}")]
    Extraction {
        /// Uploaded file name.
        filename: String,
        /// Error message.
        message: String,
    },
}
