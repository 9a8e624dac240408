//! Descriptive fallback for PDFs nothing could read.

use async_trait::async_trait;
use tracing::info;

use audioleaf_core::{Document, DocumentKind, Page, PageSource};

use crate::context::{ExtractionContext, StrategyOutcome};
use crate::ExtractionStrategy;

/// Structural markers suggesting the PDF holds scanned images.
const IMAGE_MARKERS: [&str; 5] = ["/XObject", "/Image", "/Subtype", "stream", "endstream"];

pub const IMAGE_PAGE_NOTE: &str = "Image content - OCR processing required.";
pub const EMPTY_PAGE_NOTE: &str = "No readable text was found on this page.";

/// Whether the raw payload carries any image-related structure markers.
pub fn has_image_markers(bytes: &[u8]) -> bool {
    let decoded = String::from_utf8_lossy(bytes);
    IMAGE_MARKERS.iter().any(|marker| decoded.contains(marker))
}

/// Guidance for a PDF that appears to be scanned images.
pub fn image_based_guidance(document: &Document) -> String {
    format!(
        "PDF Document: {name}\n\
         \n\
         This PDF appears to contain scanned images rather than selectable text.\n\
         \n\
         To have it read aloud:\n\
         1. Run the PDF through an OCR tool (Adobe Acrobat, Google Drive, or an online OCR service)\n\
         2. Or open it in Google Drive, choose \"Open with Google Docs\", and upload the converted document\n\
         3. Or copy the text manually if you can select it in a PDF viewer",
        name = document.file_name(),
    )
}

/// Guidance for a PDF whose content is compressed or encoded beyond reach.
pub fn encoded_content_guidance(document: &Document) -> String {
    format!(
        "PDF Document: {name}\n\
         File size: {kb} KB ({bytes} bytes)\n\
         \n\
         The text in this PDF is compressed or encoded in a way that could not be read.\n\
         \n\
         Recommendations:\n\
         1. Open the PDF in a viewer and check whether the text can be selected\n\
         2. Re-export it with \"Save as PDF\" or \"Print to PDF\" from the original application\n\
         3. Convert it to a Word document and upload that instead",
        name = document.file_name(),
        kb = document.size_kb(),
        bytes = document.byte_size(),
    )
}

/// Strategy that explains why no text could be produced.
///
/// When the page count is known, page 1 carries the document-level guidance
/// and any other blank page gets a short note, so the page count still
/// matches the physical document.
#[derive(Debug, Default)]
pub struct GuidanceStrategy;

impl GuidanceStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExtractionStrategy for GuidanceStrategy {
    fn name(&self) -> &str {
        "guidance"
    }

    fn applies_to(&self, kind: DocumentKind) -> bool {
        kind.is_pdf()
    }

    async fn attempt(&self, ctx: &mut ExtractionContext<'_>) -> StrategyOutcome {
        let image_based = has_image_markers(ctx.document.bytes());
        let guidance = if image_based {
            image_based_guidance(ctx.document)
        } else {
            encoded_content_guidance(ctx.document)
        };
        info!(image_based, file = ctx.document.file_name(), "Emitting descriptive guidance");

        if ctx.pages.is_empty() {
            ctx.replace_with_single(Page::diagnostic(1, guidance));
            return StrategyOutcome::Complete;
        }

        let note = if image_based {
            IMAGE_PAGE_NOTE
        } else {
            EMPTY_PAGE_NOTE
        };
        for page in ctx.pages.iter_mut().filter(|p| p.is_blank()) {
            if page.page_number == 1 {
                page.supersede(guidance.as_str(), PageSource::Diagnostic);
            } else {
                page.supersede(note, PageSource::Diagnostic);
            }
        }

        StrategyOutcome::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audioleaf_core::types::MEDIA_TYPE_PDF;

    #[test]
    fn test_image_markers() {
        assert!(has_image_markers(b"%PDF-1.4 /Type /XObject"));
        assert!(has_image_markers(b"... endstream ..."));
        assert!(!has_image_markers(b"%PDF-1.4 plain"));
    }

    #[test]
    fn test_guidance_texts() {
        let doc = Document::new(vec![0u8; 2048], MEDIA_TYPE_PDF, "scan.pdf");
        assert!(image_based_guidance(&doc).contains("scan.pdf"));

        let encoded = encoded_content_guidance(&doc);
        assert!(encoded.contains("File size: 2 KB (2048 bytes)"));
        assert!(encoded.contains("Recommendations"));
    }
}
