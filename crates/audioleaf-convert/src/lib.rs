//! audioleaf-convert - PDF and Word format conversion.
//!
//! [`ConversionService`] validates the source, calls a
//! [`ConversionBackend`] with bounded linear-backoff retry, and bounds the
//! whole call with one deadline.
//!
//! # Example
//!
//! ```ignore
//! use audioleaf_convert::{ConversionKind, ConversionService, SourceFile};
//!
//! let service = ConversionService::new(config.conversion)?;
//! let source = SourceFile::from_path("lecture.docx").await?;
//! let converted = service.convert(&source, ConversionKind::WordToPdf, None).await?;
//! converted.save_to("out").await?;
//! ```

mod backoff;
mod error;
mod http;
mod progress;
mod service;
mod synthetic;
mod types;
mod validate;

pub use backoff::{LinearBackoff, LinearBackoffBuilder};
pub use error::{ConversionError, ConversionResult};
pub use http::HttpConversionBackend;
pub use progress::{ConversionProgress, ProgressCallback};
pub use service::ConversionService;
pub use synthetic::SyntheticConversionBackend;
pub use types::{output_file_name, ConversionKind, ConvertedFile, SourceFile};
pub use validate::{validate_source, MSG_EMPTY, MSG_NOT_PDF, MSG_NOT_WORD, MSG_TOO_LARGE};

use async_trait::async_trait;

/// Something that can turn one document format into another.
#[async_trait]
pub trait ConversionBackend: Send + Sync {
    /// Produce the converted bytes. Progress reports are optional.
    async fn convert(
        &self,
        source: &SourceFile,
        kind: ConversionKind,
        progress: &ConversionProgress,
    ) -> ConversionResult<Vec<u8>>;

    fn name(&self) -> &str;
}
