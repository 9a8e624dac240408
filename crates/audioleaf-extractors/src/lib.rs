//! audioleaf-extractors - Text extraction for PDF and Word documents.
//!
//! Documents run through an ordered chain of strategies. The first one to
//! produce text wins; later ones only run when earlier ones come up empty.
//!
//! # Features
//!
//! - `pdf` (default) - PDF text layer parsing via lopdf
//! - `docx` (default) - DOCX text extraction via docx-rs
//! - `ocr` - Page recognition via tesseract (requires tesseract installed)
//! - `full` - All extraction features
//!
//! # Example
//!
//! ```ignore
//! use audioleaf_extractors::Orchestrator;
//!
//! let orchestrator = Orchestrator::builder(config.extraction)
//!     .with_render_surface(surface)
//!     .with_recognition_engine(Arc::new(TesseractEngine::new()))
//!     .build();
//! let result = orchestrator.extract(&document).await?;
//! println!("{}", result.full_text());
//! ```

mod context;
mod error;
mod factory;
mod guidance;
mod heuristic;
mod ocr;
mod orchestrator;
mod progress;
mod rasterizer;
mod recognition;
mod structural;
mod word;

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "docx")]
mod docx;

#[cfg(feature = "ocr")]
mod tesseract;

pub use context::{ExtractionContext, StrategyOutcome};
pub use error::{ErrorClass, ExtractError, ExtractResult};
pub use factory::StrategyFactory;
pub use guidance::{GuidanceStrategy, EMPTY_PAGE_NOTE, IMAGE_PAGE_NOTE};
pub use heuristic::{HeuristicExtractor, HeuristicStrategy};
pub use ocr::OcrStrategy;
pub use orchestrator::{validate_document, ExtractionPipelineBuilder, Orchestrator};
pub use progress::{ProgressTracker, LABEL_COMPLETED};
pub use rasterizer::{PageRasterizer, RasterError};
pub use recognition::{
    RecognitionError, Recognizer, OCR_FAILED, OCR_TIMED_OUT, OCR_UNAVAILABLE, RENDER_FAILED,
};
pub use structural::{StructuralTextExtractor, TextLayerStrategy};
pub use word::{word_failure_placeholder, WordDocumentStrategy};

#[cfg(feature = "pdf")]
pub use pdf::LopdfParser;

#[cfg(feature = "docx")]
pub use docx::DocxParser;

#[cfg(feature = "ocr")]
pub use tesseract::TesseractEngine;

use async_trait::async_trait;
use audioleaf_core::DocumentKind;

/// One step of the extraction chain.
///
/// Strategies never return errors for page-level trouble; they write
/// diagnostics into the affected pages instead and only report `Failed`
/// when the whole step broke.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short stable name, recorded on the result.
    fn name(&self) -> &str;

    /// Whether the strategy handles this kind of document.
    fn applies_to(&self, kind: DocumentKind) -> bool;

    /// Try to fill `ctx.pages`.
    async fn attempt(&self, ctx: &mut ExtractionContext<'_>) -> StrategyOutcome;
}
