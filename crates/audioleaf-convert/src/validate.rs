//! Up-front checks on a conversion source file.

use tracing::warn;

use crate::error::{ConversionError, ConversionResult};
use crate::types::{ConversionKind, SourceFile};

pub const MSG_TOO_LARGE: &str = "File size must be less than 50MB.";
pub const MSG_EMPTY: &str = "File appears to be empty. Please select a valid file.";
pub const MSG_NOT_PDF: &str = "Please select a PDF file for conversion to Word.";
pub const MSG_NOT_WORD: &str = "Please select a Word document (.docx or .doc) for conversion to PDF.";

/// Reject a source file that can never convert. Runs before any backend call.
pub fn validate_source(
    file: &SourceFile,
    kind: ConversionKind,
    max_size: u64,
) -> ConversionResult<()> {
    if file.size() > max_size {
        return Err(ConversionError::validation(MSG_TOO_LARGE));
    }
    if file.size() == 0 {
        return Err(ConversionError::validation(MSG_EMPTY));
    }

    let extension = file.extension().unwrap_or_default();
    if !kind.source_extensions().contains(&extension.as_str()) {
        let message = match kind {
            ConversionKind::PdfToWord => MSG_NOT_PDF,
            ConversionKind::WordToPdf => MSG_NOT_WORD,
        };
        return Err(ConversionError::validation(message));
    }

    if kind == ConversionKind::WordToPdf && has_parenthesized_name(file.name()) {
        warn!(file = file.name(), "File name contains parentheses; the document may be damaged");
    }

    Ok(())
}

/// Names like `report (1).docx`, typical of re-downloaded copies.
pub fn has_parenthesized_name(name: &str) -> bool {
    name.contains('(') && name.contains(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 50 * 1024 * 1024;

    fn message(result: ConversionResult<()>) -> String {
        match result {
            Err(ConversionError::Validation(message)) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_size_checks_come_first() {
        let empty = SourceFile::new("notes.txt", Vec::new());
        assert_eq!(message(validate_source(&empty, ConversionKind::WordToPdf, LIMIT)), MSG_EMPTY);

        let big = SourceFile::new("scan.pdf", vec![0u8; 11]);
        assert_eq!(message(validate_source(&big, ConversionKind::PdfToWord, 10)), MSG_TOO_LARGE);
    }

    #[test]
    fn test_extension_must_match_direction() {
        let pdf = SourceFile::new("scan.PDF", vec![1]);
        assert!(validate_source(&pdf, ConversionKind::PdfToWord, LIMIT).is_ok());
        assert_eq!(message(validate_source(&pdf, ConversionKind::WordToPdf, LIMIT)), MSG_NOT_WORD);

        let doc = SourceFile::new("old.doc", vec![1]);
        assert!(validate_source(&doc, ConversionKind::WordToPdf, LIMIT).is_ok());
        assert_eq!(message(validate_source(&doc, ConversionKind::PdfToWord, LIMIT)), MSG_NOT_PDF);
    }

    #[test]
    fn test_parenthesized_name_is_accepted() {
        let copy = SourceFile::new("report (1).docx", vec![1]);
        assert!(has_parenthesized_name(copy.name()));
        assert!(validate_source(&copy, ConversionKind::WordToPdf, LIMIT).is_ok());
    }
}
