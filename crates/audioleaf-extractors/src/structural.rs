//! Native text-layer extraction.
//!
//! [`StructuralTextExtractor`] walks a parsed document page by page.
//! [`TextLayerStrategy`] loads the document through an ordered list of
//! parsers and records one page per physical page, blank or not.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use audioleaf_core::{DocumentKind, DocumentParser, Page, ParsedDocument};

use crate::context::{ExtractionContext, StrategyOutcome};
use crate::error::{ExtractError, ExtractResult};
use crate::progress::{label_extracting_page, scaled};
use crate::ExtractionStrategy;

/// Reads per-page text from a parsed document.
pub struct StructuralTextExtractor {
    document: Arc<dyn ParsedDocument>,
}

impl StructuralTextExtractor {
    pub fn new(document: Arc<dyn ParsedDocument>) -> Self {
        Self { document }
    }

    pub fn page_count(&self) -> u32 {
        self.document.page_count()
    }

    /// Text of a 1-based page: its tokens joined with single spaces.
    pub async fn page_text(&self, page_number: u32) -> ExtractResult<String> {
        let document = Arc::clone(&self.document);
        let tokens =
            tokio::task::spawn_blocking(move || document.page_tokens(page_number)).await??;
        Ok(tokens.join(" "))
    }
}

/// Strategy reading the PDF text layer.
pub struct TextLayerStrategy {
    parsers: Vec<Arc<dyn DocumentParser>>,
    parse_timeout: Duration,
}

impl TextLayerStrategy {
    pub fn new(parsers: Vec<Arc<dyn DocumentParser>>, parse_timeout: Duration) -> Self {
        Self {
            parsers,
            parse_timeout,
        }
    }

    /// Try each parser in order until one loads the document.
    ///
    /// Returns `Ok(None)` when every parser rejected the document and a
    /// timeout error when any load overran its budget.
    async fn load(&self, source: Arc<[u8]>) -> ExtractResult<Option<Arc<dyn ParsedDocument>>> {
        for parser in &self.parsers {
            let worker = Arc::clone(parser);
            let bytes = Arc::clone(&source);
            let load = tokio::task::spawn_blocking(move || worker.parse(&bytes));

            match tokio::time::timeout(self.parse_timeout, load).await {
                Err(_) => {
                    warn!(parser = parser.name(), timeout = ?self.parse_timeout, "Document load timed out");
                    return Err(ExtractError::timeout(
                        format!("Loading document with {}", parser.name()),
                        self.parse_timeout,
                    ));
                }
                Ok(Err(join)) => {
                    warn!(parser = parser.name(), error = %join, "Parser task failed");
                }
                Ok(Ok(Err(e))) => {
                    debug!(parser = parser.name(), error = %e, "Parser rejected document");
                }
                Ok(Ok(Ok(parsed))) => {
                    debug!(parser = parser.name(), pages = parsed.page_count(), "Document loaded");
                    return Ok(Some(Arc::from(parsed)));
                }
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl ExtractionStrategy for TextLayerStrategy {
    fn name(&self) -> &str {
        "text-layer"
    }

    fn applies_to(&self, kind: DocumentKind) -> bool {
        kind.is_pdf()
    }

    async fn attempt(&self, ctx: &mut ExtractionContext<'_>) -> StrategyOutcome {
        let parsed = match self.load(ctx.document.shared_bytes()).await {
            Ok(Some(parsed)) => parsed,
            Ok(None) => {
                warn!(file = ctx.document.file_name(), "No parser could load the document");
                return StrategyOutcome::Empty;
            }
            Err(e) => return StrategyOutcome::Failed(e),
        };

        let extractor = StructuralTextExtractor::new(parsed);
        let total = extractor.page_count();
        let mut pages = Vec::with_capacity(total as usize);
        let mut has_text = false;

        for page_number in 1..=total {
            ctx.progress.report(
                scaled(0.0, 50.0, (page_number - 1) as f32 / total as f32),
                label_extracting_page(page_number),
            );

            let text = match extractor.page_text(page_number).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(page = page_number, error = %e, "Failed to read page text layer");
                    String::new()
                }
            };
            has_text |= !text.trim().is_empty();
            pages.push(Page::parsed(page_number, text));
            ctx.progress
                .advance(scaled(0.0, 50.0, page_number as f32 / total as f32));
        }

        info!(pages = total, has_text, "Text layer scanned");
        ctx.pages = pages;

        if has_text {
            StrategyOutcome::Complete
        } else {
            StrategyOutcome::Empty
        }
    }
}
