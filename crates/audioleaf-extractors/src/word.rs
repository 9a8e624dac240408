//! Word-processor documents.
//!
//! Word files have no pages, so the whole text becomes page 1. A parse
//! failure never fails the document: the page instead explains what went
//! wrong and how the user can recover.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use audioleaf_core::{Document, DocumentKind, Page, WordFormat, WordParser};

use crate::context::{ExtractionContext, StrategyOutcome};
use crate::ExtractionStrategy;

const LABEL_WORD: &str = "Extracting text from Word document...";

/// Strategy delegating Word documents to a [`WordParser`].
pub struct WordDocumentStrategy {
    parser: Arc<dyn WordParser>,
    parse_timeout: Duration,
}

impl WordDocumentStrategy {
    pub fn new(parser: Arc<dyn WordParser>, parse_timeout: Duration) -> Self {
        Self {
            parser,
            parse_timeout,
        }
    }

    async fn read(&self, document: &Document, format: WordFormat) -> Result<String, String> {
        let parser = Arc::clone(&self.parser);
        let bytes = document.shared_bytes();
        let task = tokio::task::spawn_blocking(move || parser.extract_text(&bytes, format));

        match tokio::time::timeout(self.parse_timeout, task).await {
            Err(_) => Err(format!("parsing timed out after {:?}", self.parse_timeout)),
            Ok(Err(join)) => Err(join.to_string()),
            Ok(Ok(Err(e))) => Err(e.to_string()),
            Ok(Ok(Ok(text))) if text.trim().is_empty() => {
                Err("the document contains no readable text".to_string())
            }
            Ok(Ok(Ok(text))) => Ok(text.trim().to_string()),
        }
    }
}

#[async_trait]
impl ExtractionStrategy for WordDocumentStrategy {
    fn name(&self) -> &str {
        "word-document"
    }

    fn applies_to(&self, kind: DocumentKind) -> bool {
        kind.is_word()
    }

    async fn attempt(&self, ctx: &mut ExtractionContext<'_>) -> StrategyOutcome {
        let DocumentKind::Word(format) = ctx.kind else {
            return StrategyOutcome::Empty;
        };
        ctx.progress.report(50.0, LABEL_WORD);

        let page = match self.read(ctx.document, format).await {
            Ok(text) => {
                info!(parser = self.parser.name(), chars = text.len(), "Word document parsed");
                Page::parsed(1, text)
            }
            Err(reason) => {
                warn!(
                    parser = self.parser.name(),
                    file = ctx.document.file_name(),
                    %reason,
                    "Word parsing failed, using placeholder"
                );
                Page::diagnostic(1, word_failure_placeholder(ctx.document, format, &reason))
            }
        };

        ctx.replace_with_single(page);
        StrategyOutcome::Complete
    }
}

/// Explanatory text shown in place of an unreadable Word document.
pub fn word_failure_placeholder(document: &Document, format: WordFormat, reason: &str) -> String {
    format!(
        "Word Document: {name}\n\
         File size: {kb} KB\n\
         Document type: {kind}\n\
         \n\
         Text extraction was attempted but encountered an issue: {reason}\n\
         \n\
         To read this document aloud:\n\
         1. Open the document in Microsoft Word or Google Docs\n\
         2. Select all text (Ctrl+A) and copy it (Ctrl+C)\n\
         3. Paste it into a plain text file and upload that instead\n\
         \n\
         Alternatively, save the document as a PDF and upload the PDF.",
        name = document.file_name(),
        kb = document.size_kb(),
        kind = format.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use audioleaf_core::types::MEDIA_TYPE_DOCX;

    #[test]
    fn test_placeholder_mentions_file_and_reason() {
        let doc = Document::new(vec![0u8; 4096], MEDIA_TYPE_DOCX, "thesis.docx");
        let text = word_failure_placeholder(&doc, WordFormat::Docx, "zip header missing");

        assert!(text.starts_with("Word Document: thesis.docx"));
        assert!(text.contains("File size: 4 KB"));
        assert!(text.contains("DOCX (Modern Word format)"));
        assert!(text.contains("encountered an issue: zip header missing"));
        assert!(text.contains("save the document as a PDF"));
    }

    #[test]
    fn test_placeholder_rounds_size_to_nearest_kb() {
        let doc = Document::new(vec![0u8; 1800], MEDIA_TYPE_DOCX, "memo.docx");
        let text = word_failure_placeholder(&doc, WordFormat::Docx, "empty body");
        assert!(text.contains("File size: 2 KB"));
    }
}
