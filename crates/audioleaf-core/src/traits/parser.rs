//! Structural parser traits.
//!
//! Parsers are synchronous and CPU-bound; the pipeline runs them on a
//! blocking thread.

use crate::error::EngineError;
use crate::types::WordFormat;

/// A document loaded by a [`DocumentParser`], addressable page by page.
pub trait ParsedDocument: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Text-layer tokens of a 1-based page, in content order. A page with
    /// no text layer yields an empty vector.
    fn page_tokens(&self, page_number: u32) -> Result<Vec<String>, EngineError>;
}

/// Core parser trait for paginated (PDF-like) documents.
pub trait DocumentParser: Send + Sync {
    /// Load a document from its raw bytes.
    fn parse(&self, bytes: &[u8]) -> Result<Box<dyn ParsedDocument>, EngineError>;

    /// Get the parser name.
    fn name(&self) -> &str;
}

/// Parser for word-processor documents, which have no page structure.
pub trait WordParser: Send + Sync {
    /// Extract the document's plain text.
    fn extract_text(&self, bytes: &[u8], format: WordFormat) -> Result<String, EngineError>;

    /// Get the parser name.
    fn name(&self) -> &str;
}
