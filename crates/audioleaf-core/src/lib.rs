//! audioleaf-core - Core library for audioleaf.
//!
//! This crate provides the document model, the engine traits the extraction
//! pipeline and playback session are built on, and the shared configuration
//! for the audioleaf read-aloud toolkit.
//!
//! # Example
//!
//! ```ignore
//! use audioleaf_core::{AudioleafConfig, Document};
//!
//! let config = AudioleafConfig::from_file("audioleaf.toml")?;
//! let document = Document::from_path("report.pdf")?;
//! assert!(document.byte_size() <= config.extraction.max_file_size_bytes);
//! ```

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{AudioleafConfig, ConversionConfig, ExtractionConfig, PlaybackConfig};
pub use error::{AudioleafError, AudioleafResult, EngineError, ErrorCode};
pub use traits::{
    DocumentParser, NarrationEngine, ParsedDocument, RecognitionEngine, RecognitionProgress,
    RenderSurface, WordParser,
};
pub use types::{
    Document, DocumentKind, ExtractionProgress, ExtractionResult, NarrationEvent,
    NarrationEventKind, NarrationEventSender, NarrationRequest, Page, PageBitmap, PageSource,
    UtteranceId, Viewport, VoiceFilter, VoiceProfile, WordFormat,
};
