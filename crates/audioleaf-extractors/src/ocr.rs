//! OCR fallback for PDFs without a text layer.
//!
//! Rasterizes every page (50-75%) and then recognizes the bitmaps one at a
//! time (75-100%). Failures are contained to the page they happen on.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use audioleaf_core::{DocumentKind, PageBitmap, PageSource, RecognitionProgress};

use crate::context::{ExtractionContext, StrategyOutcome};
use crate::progress::{label_recognizing, label_rendering_page, scaled, LABEL_OCR_FALLBACK};
use crate::rasterizer::{PageRasterizer, RasterError};
use crate::recognition::{Recognizer, OCR_UNAVAILABLE, RENDER_FAILED};
use crate::ExtractionStrategy;

/// Strategy that renders pages and runs them through the recognizer.
pub struct OcrStrategy {
    rasterizer: Arc<PageRasterizer>,
    recognizer: Option<Arc<Recognizer>>,
}

impl OcrStrategy {
    pub fn new(rasterizer: Arc<PageRasterizer>, recognizer: Option<Arc<Recognizer>>) -> Self {
        Self {
            rasterizer,
            recognizer,
        }
    }

    async fn recognizer_ready(&self) -> Option<&Arc<Recognizer>> {
        let recognizer = self.recognizer.as_ref()?;
        recognizer.initialize().await.then_some(recognizer)
    }
}

#[async_trait]
impl ExtractionStrategy for OcrStrategy {
    fn name(&self) -> &str {
        "ocr"
    }

    fn applies_to(&self, kind: DocumentKind) -> bool {
        kind.is_pdf()
    }

    async fn attempt(&self, ctx: &mut ExtractionContext<'_>) -> StrategyOutcome {
        let Some(total) = ctx.known_page_count() else {
            // Without a page count there is nothing to render.
            return StrategyOutcome::Empty;
        };
        ctx.progress.report(50.0, LABEL_OCR_FALLBACK);

        let Some(recognizer) = self.recognizer_ready().await else {
            warn!(pages = total, "Recognition engine unavailable, filling pages with diagnostics");
            for page in &mut ctx.pages {
                page.supersede(OCR_UNAVAILABLE, PageSource::Diagnostic);
            }
            ctx.progress.advance(100.0);
            return StrategyOutcome::Complete;
        };

        let source = ctx.document.bytes();
        let mut bitmaps: Vec<Result<PageBitmap, RasterError>> = Vec::with_capacity(total as usize);
        for page_number in 1..=total {
            ctx.progress.report(
                scaled(50.0, 75.0, page_number as f32 / total as f32),
                label_rendering_page(page_number),
            );
            let rendered = self.rasterizer.render(source, page_number).await;
            if let Err(e) = &rendered {
                warn!(page = page_number, error = %e, "Failed to render page");
            }
            bitmaps.push(rendered);
        }

        let mut recognized = 0usize;
        for (index, (page, bitmap)) in ctx.pages.iter_mut().zip(bitmaps).enumerate() {
            let index = index as u32;
            let window_start = scaled(75.0, 100.0, index as f32 / total as f32);
            let window_end = scaled(75.0, 100.0, (index + 1) as f32 / total as f32);
            ctx.progress
                .report(window_start, label_recognizing(index + 1, total));

            let bitmap = match bitmap {
                Ok(bitmap) => bitmap,
                Err(_) => {
                    page.supersede(RENDER_FAILED, PageSource::Diagnostic);
                    continue;
                }
            };

            let tracker = ctx.progress.clone();
            let forward: RecognitionProgress =
                Arc::new(move |fraction| tracker.advance(scaled(window_start, window_end, fraction)));

            match recognizer.recognize(&bitmap, forward).await {
                Ok(text) => {
                    recognized += 1;
                    page.supersede(text.trim(), PageSource::Recognized);
                }
                Err(e) => {
                    warn!(page = page.page_number, error = %e, "Recognition failed for page");
                    page.supersede(e.diagnostic(), PageSource::Diagnostic);
                }
            }
            ctx.progress.advance(window_end);
        }

        info!(pages = total, recognized, "OCR pass finished");

        if ctx.has_text() {
            StrategyOutcome::Complete
        } else {
            StrategyOutcome::Empty
        }
    }
}
