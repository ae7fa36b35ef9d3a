//! Error types for docsift.

use std::io;
use thiserror::Error;

/// Result type alias for docsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while analysing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading inputs or writing results.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we do not understand.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The document could not be opened or decoded at all.
    #[error("Failed to open document {path}: {reason}")]
    DocumentOpen {
        /// Path (or identifier) of the document
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// The document has no pages.
    #[error("Document has no pages: {0}")]
    EmptyDocument(String),

    /// The ranking request is missing required fields or is not valid JSON.
    #[error("Malformed request file: {0}")]
    MalformedRequest(String),

    /// A user supplied pattern failed to compile.
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Error while serializing results.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the error only concerns a single document.
    ///
    /// Batch runs log these and continue with the remaining documents.
    pub fn is_document_local(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::PdfParse(_)
                | Error::Encrypted
                | Error::DocumentOpen { .. }
                | Error::EmptyDocument(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyDocument("report.pdf".to_string());
        assert_eq!(err.to_string(), "Document has no pages: report.pdf");

        let err = Error::DocumentOpen {
            path: "broken.pdf".to_string(),
            reason: "trailer not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to open document broken.pdf: trailer not found"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_document_local_classification() {
        assert!(Error::Encrypted.is_document_local());
        assert!(Error::EmptyDocument("x".into()).is_document_local());
        assert!(!Error::MalformedRequest("missing persona".into()).is_document_local());
        assert!(!Error::Io(io::Error::new(io::ErrorKind::Other, "disk full")).is_document_local());
    }
}
