//! Extraction orchestrator: validation plus the strategy chain.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use audioleaf_core::{
    Document, DocumentKind, DocumentParser, ExtractionConfig, ExtractionProgress,
    ExtractionResult, RecognitionEngine, RenderSurface, WordParser,
};

use crate::context::{ExtractionContext, StrategyOutcome};
use crate::error::{ExtractError, ExtractResult};
use crate::factory::StrategyFactory;
use crate::progress::{ProgressTracker, LABEL_ANALYZING, LABEL_COMPLETED, LABEL_FINALIZING};
use crate::rasterizer::PageRasterizer;
use crate::recognition::Recognizer;
use crate::ExtractionStrategy;

/// Check size and format before any engine is touched.
pub fn validate_document(document: &Document, max_size: u64) -> ExtractResult<DocumentKind> {
    let size = document.byte_size();
    if size > max_size {
        return Err(ExtractError::Oversize {
            size,
            limit: max_size,
        });
    }

    let kind = document.kind().ok_or_else(|| {
        ExtractError::InvalidFormat(format!(
            "unsupported file type '{}' ({})",
            document.media_type(),
            document.file_name()
        ))
    })?;

    if kind.is_pdf() && !document.has_pdf_magic() {
        return Err(ExtractError::InvalidFormat(
            "file does not start with a %PDF header".to_string(),
        ));
    }

    Ok(kind)
}

/// Runs documents through an ordered chain of extraction strategies.
///
/// The first strategy to complete supplies the pages. A failed strategy is
/// logged and skipped unless its error is fatal (timeouts), in which case
/// the whole extraction fails.
pub struct Orchestrator {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
    config: ExtractionConfig,
    recognizer: Option<Arc<Recognizer>>,
}

impl Orchestrator {
    /// Orchestrator with the default parsers and no OCR path.
    pub fn new(config: ExtractionConfig) -> Self {
        ExtractionPipelineBuilder::new(config).build()
    }

    pub fn builder(config: ExtractionConfig) -> ExtractionPipelineBuilder {
        ExtractionPipelineBuilder::new(config)
    }

    /// Orchestrator running an explicit strategy chain.
    pub fn with_strategies(
        strategies: Vec<Arc<dyn ExtractionStrategy>>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            strategies,
            config,
            recognizer: None,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// The session's recognizer, if OCR is configured.
    pub fn recognizer(&self) -> Option<&Arc<Recognizer>> {
        self.recognizer.as_ref()
    }

    /// Extract a document without a progress listener.
    pub async fn extract(&self, document: &Document) -> ExtractResult<ExtractionResult> {
        self.extract_with_progress(document, None).await
    }

    /// Extract a document, reporting progress on `progress`.
    pub async fn extract_with_progress(
        &self,
        document: &Document,
        progress: Option<UnboundedSender<ExtractionProgress>>,
    ) -> ExtractResult<ExtractionResult> {
        let tracker = ProgressTracker::new(progress);
        tracker.report(0.0, LABEL_ANALYZING);

        let kind = validate_document(document, self.config.max_file_size_bytes)?;
        info!(
            file = document.file_name(),
            size = document.byte_size(),
            ?kind,
            "Extracting document"
        );

        let mut ctx = ExtractionContext::new(document, kind, &self.config, tracker.clone());
        let mut completed_by = None;

        for strategy in self.strategies.iter().filter(|s| s.applies_to(kind)) {
            debug!(strategy = strategy.name(), "Attempting extraction strategy");
            match strategy.attempt(&mut ctx).await {
                StrategyOutcome::Complete => {
                    completed_by = Some(strategy.name());
                    break;
                }
                StrategyOutcome::Empty => {
                    debug!(strategy = strategy.name(), "Strategy produced no text");
                }
                StrategyOutcome::Failed(e) if e.is_fatal() => {
                    warn!(strategy = strategy.name(), error = %e, "Extraction aborted");
                    return Err(e);
                }
                StrategyOutcome::Failed(e) => {
                    warn!(strategy = strategy.name(), error = %e, "Strategy failed, trying next");
                }
            }
        }

        tracker.report(tracker.percent().max(95.0), LABEL_FINALIZING);

        let Some(strategy) = completed_by else {
            info!(file = document.file_name(), "No strategy produced text");
            return Err(ExtractError::NoContent(document.file_name().to_string()));
        };

        let result = ExtractionResult::from_pages(ctx.pages, strategy);
        if result.full_text().trim().is_empty() {
            return Err(ExtractError::NoContent(document.file_name().to_string()));
        }

        tracker.report(100.0, LABEL_COMPLETED);
        info!(
            file = document.file_name(),
            strategy,
            pages = result.total_pages(),
            chars = result.full_text().len(),
            "Extraction complete"
        );
        Ok(result)
    }

    /// Release the recognition engine. Call once when the session ends.
    pub async fn shutdown(&self) {
        if let Some(recognizer) = &self.recognizer {
            recognizer.terminate().await;
        }
    }
}

/// Builder assembling an [`Orchestrator`] from configuration and engines.
pub struct ExtractionPipelineBuilder {
    config: ExtractionConfig,
    parsers: Vec<Arc<dyn DocumentParser>>,
    word_parser: Option<Arc<dyn WordParser>>,
    surface: Option<Arc<dyn RenderSurface>>,
    recognizer: Option<Arc<Recognizer>>,
}

impl ExtractionPipelineBuilder {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            parsers: Vec::new(),
            word_parser: None,
            surface: None,
            recognizer: None,
        }
    }

    /// Add a PDF parser. Parsers are tried in the order added; without any,
    /// the default parser is used.
    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parsers.push(parser);
        self
    }

    pub fn with_word_parser(mut self, parser: Arc<dyn WordParser>) -> Self {
        self.word_parser = Some(parser);
        self
    }

    /// Enable the OCR path by supplying a page render surface.
    pub fn with_render_surface(mut self, surface: Arc<dyn RenderSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Wrap a recognition engine in a new session recognizer.
    pub fn with_recognition_engine(mut self, engine: Arc<dyn RecognitionEngine>) -> Self {
        self.recognizer = Some(Arc::new(Recognizer::new(
            engine,
            self.config.recognition_timeout(),
        )));
        self
    }

    /// Share an existing recognizer.
    pub fn with_recognizer(mut self, recognizer: Arc<Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn build(self) -> Orchestrator {
        let parsers = if self.parsers.is_empty() {
            StrategyFactory::default_parsers()
        } else {
            self.parsers
        };
        let word_parser = self.word_parser.or_else(StrategyFactory::default_word_parser);
        let rasterizer = self.surface.map(|surface| {
            Arc::new(PageRasterizer::new(
                surface,
                self.config.raster_scale,
                self.config.render_timeout(),
            ))
        });

        let strategies = StrategyFactory::chain(
            &self.config,
            parsers,
            word_parser,
            rasterizer,
            self.recognizer.clone(),
        );

        Orchestrator {
            strategies,
            config: self.config,
            recognizer: self.recognizer,
        }
    }
}
