//! Factory for assembling the extraction strategy chain.

use std::sync::Arc;

use audioleaf_core::{DocumentParser, ExtractionConfig, WordParser};

use crate::guidance::GuidanceStrategy;
use crate::heuristic::HeuristicStrategy;
use crate::ocr::OcrStrategy;
use crate::rasterizer::PageRasterizer;
use crate::recognition::Recognizer;
use crate::structural::TextLayerStrategy;
use crate::word::WordDocumentStrategy;
use crate::ExtractionStrategy;

#[cfg(feature = "pdf")]
use crate::pdf::LopdfParser;

#[cfg(feature = "docx")]
use crate::docx::DocxParser;

/// Factory for extraction strategies and their default parsers.
pub struct StrategyFactory;

impl StrategyFactory {
    /// Parsers compiled into this build, in preference order.
    #[allow(clippy::vec_init_then_push)]
    pub fn default_parsers() -> Vec<Arc<dyn DocumentParser>> {
        let mut parsers: Vec<Arc<dyn DocumentParser>> = Vec::new();

        #[cfg(feature = "pdf")]
        parsers.push(Arc::new(LopdfParser::new()));

        parsers
    }

    /// Word parser compiled into this build, if any.
    pub fn default_word_parser() -> Option<Arc<dyn WordParser>> {
        #[cfg(feature = "docx")]
        {
            Some(Arc::new(DocxParser::new()))
        }

        #[cfg(not(feature = "docx"))]
        {
            None
        }
    }

    pub fn word(config: &ExtractionConfig, parser: Arc<dyn WordParser>) -> Arc<dyn ExtractionStrategy> {
        Arc::new(WordDocumentStrategy::new(parser, config.parse_timeout()))
    }

    pub fn text_layer(
        config: &ExtractionConfig,
        parsers: Vec<Arc<dyn DocumentParser>>,
    ) -> Arc<dyn ExtractionStrategy> {
        Arc::new(TextLayerStrategy::new(parsers, config.parse_timeout()))
    }

    pub fn ocr(
        rasterizer: Arc<PageRasterizer>,
        recognizer: Option<Arc<Recognizer>>,
    ) -> Arc<dyn ExtractionStrategy> {
        Arc::new(OcrStrategy::new(rasterizer, recognizer))
    }

    pub fn heuristic(config: &ExtractionConfig) -> Arc<dyn ExtractionStrategy> {
        Arc::new(HeuristicStrategy::new(config.min_heuristic_chars))
    }

    pub fn guidance() -> Arc<dyn ExtractionStrategy> {
        Arc::new(GuidanceStrategy::new())
    }

    /// The full chain in the order the orchestrator runs it.
    ///
    /// OCR only joins the chain when pages can be rendered; the byte
    /// heuristic stands in for it otherwise.
    pub fn chain(
        config: &ExtractionConfig,
        parsers: Vec<Arc<dyn DocumentParser>>,
        word_parser: Option<Arc<dyn WordParser>>,
        rasterizer: Option<Arc<PageRasterizer>>,
        recognizer: Option<Arc<Recognizer>>,
    ) -> Vec<Arc<dyn ExtractionStrategy>> {
        let mut strategies = Vec::new();

        if let Some(parser) = word_parser {
            strategies.push(Self::word(config, parser));
        }
        if !parsers.is_empty() {
            strategies.push(Self::text_layer(config, parsers));
        }
        match rasterizer {
            Some(rasterizer) => strategies.push(Self::ocr(rasterizer, recognizer)),
            None => strategies.push(Self::heuristic(config)),
        }
        if config.descriptive_fallback {
            strategies.push(Self::guidance());
        }

        strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use audioleaf_core::{EngineError, PageBitmap, RenderSurface, Viewport};
    use std::time::Duration;

    struct NullSurface;

    #[async_trait]
    impl RenderSurface for NullSurface {
        async fn viewport(&self, _: &[u8], _: u32, scale: f32) -> Result<Viewport, EngineError> {
            Ok(Viewport::scaled(10.0, 10.0, scale))
        }

        async fn draw(&self, _: &[u8], _: u32, viewport: Viewport) -> Result<PageBitmap, EngineError> {
            Ok(PageBitmap::blank(viewport))
        }

        fn name(&self) -> &str {
            "null"
        }
    }

    fn names(strategies: &[Arc<dyn ExtractionStrategy>]) -> Vec<&str> {
        strategies.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn test_chain_with_rasterizer_uses_ocr() {
        let config = ExtractionConfig::default();
        let rasterizer = Arc::new(PageRasterizer::new(
            Arc::new(NullSurface),
            2.0,
            Duration::from_secs(1),
        ));
        let chain = StrategyFactory::chain(&config, Vec::new(), None, Some(rasterizer), None);
        assert_eq!(names(&chain), vec!["ocr", "guidance"]);
    }

    #[test]
    fn test_chain_without_rasterizer_uses_heuristic() {
        let config = ExtractionConfig::default().without_descriptive_fallback();
        let chain = StrategyFactory::chain(&config, Vec::new(), None, None, None);
        assert_eq!(names(&chain), vec!["byte-heuristic"]);
    }

    #[cfg(all(feature = "pdf", feature = "docx"))]
    #[test]
    fn test_default_parsers() {
        assert_eq!(StrategyFactory::default_parsers().len(), 1);
        assert_eq!(
            StrategyFactory::default_word_parser().map(|p| p.name().to_string()),
            Some("docx-rs".to_string())
        );
    }
}
