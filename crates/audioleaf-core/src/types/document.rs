//! The document payload handed to the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::AudioleafResult;

/// Magic marker every PDF payload starts with.
pub const PDF_MAGIC: &[u8] = b"%PDF";

pub const MEDIA_TYPE_PDF: &str = "application/pdf";
pub const MEDIA_TYPE_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MEDIA_TYPE_DOC: &str = "application/msword";
pub const MEDIA_TYPE_UNKNOWN: &str = "application/octet-stream";

/// Flavour of a word-processor document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordFormat {
    /// Office Open XML (`.docx`).
    Docx,
    /// Legacy binary Word format (`.doc`).
    LegacyDoc,
}

impl WordFormat {
    /// Short label used in placeholders, e.g. `DOCX (Modern Word format)`.
    pub fn label(&self) -> &'static str {
        match self {
            WordFormat::Docx => "DOCX (Modern Word format)",
            WordFormat::LegacyDoc => "DOC (Legacy Word format)",
        }
    }
}

/// What kind of document a payload is, resolved from media type and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Word(WordFormat),
}

impl DocumentKind {
    /// Resolve the kind from the declared media type, falling back to the
    /// file extension. Returns `None` for anything unsupported.
    pub fn detect(media_type: &str, file_name: &str) -> Option<Self> {
        match media_type.trim().to_ascii_lowercase().as_str() {
            MEDIA_TYPE_PDF => return Some(Self::Pdf),
            MEDIA_TYPE_DOCX => return Some(Self::Word(WordFormat::Docx)),
            MEDIA_TYPE_DOC => return Some(Self::Word(WordFormat::LegacyDoc)),
            _ => {}
        }

        match extension_of(file_name).as_deref() {
            Some("pdf") => Some(Self::Pdf),
            Some("docx") => Some(Self::Word(WordFormat::Docx)),
            Some("doc") => Some(Self::Word(WordFormat::LegacyDoc)),
            _ => None,
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, Self::Pdf)
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Self::Word(_))
    }
}

/// Media type for a file extension, as used when loading from disk.
pub fn media_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => MEDIA_TYPE_PDF,
        "docx" => MEDIA_TYPE_DOCX,
        "doc" => MEDIA_TYPE_DOC,
        _ => MEDIA_TYPE_UNKNOWN,
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// An immutable document payload with its declared media type and name.
///
/// The bytes are shared so parsers can move them onto blocking threads
/// without copying.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Arc<[u8]>,
    media_type: String,
    file_name: String,
}

impl Document {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
            media_type: media_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Read a document from disk, deriving the media type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> AudioleafResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let media_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(media_type_for_extension)
            .unwrap_or(MEDIA_TYPE_UNKNOWN);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(bytes, media_type, file_name))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the payload.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in kilobytes, rounded to the nearest whole KB.
    pub fn size_kb(&self) -> u64 {
        (self.byte_size() + 512) / 1024
    }

    /// Whether the payload starts with the `%PDF` marker.
    pub fn has_pdf_magic(&self) -> bool {
        self.bytes.starts_with(PDF_MAGIC)
    }

    /// Resolve the document kind from media type and file name.
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::detect(&self.media_type, &self.file_name)
    }
}
