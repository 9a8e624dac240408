//! Offline stand-in for the conversion API.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::{ConversionError, ConversionResult};
use crate::progress::ConversionProgress;
use crate::types::{ConversionKind, SourceFile};
use crate::validate::has_parenthesized_name;
use crate::ConversionBackend;

const PROGRESS_STEPS: [f32; 5] = [18.0, 36.0, 54.0, 72.0, 90.0];

pub const MSG_DAMAGED_WORD: &str = "The Word document appears to be corrupted or contains unreadable content. Please try with a different file or repair the document in Microsoft Word first.";

/// Backend producing a minimal placeholder document locally.
///
/// Used when no API key is configured. Output names the source file so
/// the result is recognizable, but carries none of its content.
#[derive(Debug, Clone)]
pub struct SyntheticConversionBackend {
    step: Duration,
}

impl SyntheticConversionBackend {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }
}

#[async_trait]
impl ConversionBackend for SyntheticConversionBackend {
    async fn convert(
        &self,
        source: &SourceFile,
        kind: ConversionKind,
        progress: &ConversionProgress,
    ) -> ConversionResult<Vec<u8>> {
        if kind == ConversionKind::WordToPdf && has_parenthesized_name(source.name()) {
            tokio::time::sleep(self.step).await;
            return Err(ConversionError::Permanent(MSG_DAMAGED_WORD.to_string()));
        }

        for percent in PROGRESS_STEPS {
            tokio::time::sleep(self.step).await;
            progress.report(percent);
        }

        debug!(file = source.name(), %kind, "Synthetic conversion finished");
        Ok(match kind {
            ConversionKind::PdfToWord => word_body(source.name()),
            ConversionKind::WordToPdf => single_page_pdf(source.name()),
        }
        .into_bytes())
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

fn word_body(source_name: &str) -> String {
    let name = source_name
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Converted from: {name}</w:t></w:r></w:p>
    <w:p><w:r><w:t>This is a converted Word document from the original PDF file.</w:t></w:r></w:p>
  </w:body>
</w:document>
"#
    )
}

fn single_page_pdf(source_name: &str) -> String {
    let name = source_name
        .replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)");
    let stream = format!(
        "BT\n/F1 12 Tf\n72 720 Td\n(Converted from: {name}) Tj\n0 -20 Td\n(This is a converted PDF from the original Word document.) Tj\nET\n"
    );
    format!(
        "%PDF-1.4\n\
         1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
         2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n\
         3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R >>\nendobj\n\
         4 0 obj\n<< /Length {len} >>\nstream\n{stream}endstream\nendobj\n\
         trailer\n<< /Size 5 /Root 1 0 R >>\n%%EOF\n",
        len = stream.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test(start_paused = true)]
    async fn test_steps_progress_to_90() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = ConversionProgress::new(Some(Arc::new(move |p: f32| {
            sink.lock().unwrap().push(p);
        })));

        let backend = SyntheticConversionBackend::new(Duration::from_millis(200));
        let bytes = backend
            .convert(
                &SourceFile::new("lecture.docx", vec![1]),
                ConversionKind::WordToPdf,
                &progress,
            )
            .await
            .unwrap();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(String::from_utf8_lossy(&bytes).contains("Converted from: lecture.docx"));
        assert_eq!(*seen.lock().unwrap(), PROGRESS_STEPS.to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn test_parenthesized_word_name_fails_permanently() {
        let backend = SyntheticConversionBackend::new(Duration::from_millis(200));
        let err = backend
            .convert(
                &SourceFile::new("report (2).docx", vec![1]),
                ConversionKind::WordToPdf,
                &ConversionProgress::silent(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::Permanent(_)));
    }

    #[test]
    fn test_word_body_escapes_name() {
        let body = word_body("a<b>&c.pdf");
        assert!(body.contains("a&lt;b&gt;&amp;c.pdf"));
    }

    #[test]
    fn test_pdf_escapes_name() {
        let pdf = single_page_pdf("notes (draft).docx");
        assert!(pdf.contains(r"notes \(draft\).docx"));
    }
}
