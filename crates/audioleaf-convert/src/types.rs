//! Conversion request and result types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use audioleaf_core::types::{MEDIA_TYPE_DOCX, MEDIA_TYPE_PDF};

/// Direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConversionKind {
    PdfToWord,
    WordToPdf,
}

impl ConversionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PdfToWord => "pdfToWord",
            Self::WordToPdf => "wordToPdf",
        }
    }

    /// Extensions (lowercase, without dot) the source file may carry.
    pub fn source_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::PdfToWord => &["pdf"],
            Self::WordToPdf => &["docx", "doc"],
        }
    }

    /// Extension given to the converted file.
    pub fn target_extension(&self) -> &'static str {
        match self {
            Self::PdfToWord => "docx",
            Self::WordToPdf => "pdf",
        }
    }

    pub fn target_media_type(&self) -> &'static str {
        match self {
            Self::PdfToWord => MEDIA_TYPE_DOCX,
            Self::WordToPdf => MEDIA_TYPE_PDF,
        }
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdfToWord" => Ok(Self::PdfToWord),
            "wordToPdf" => Ok(Self::WordToPdf),
            other => Err(format!("unknown conversion '{other}'")),
        }
    }
}

/// A file handed in for conversion.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a source file from disk, keeping only its file name.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

/// Name of the converted file: the source base name with the target extension.
pub fn output_file_name(source_name: &str, kind: ConversionKind) -> String {
    let base = source_name
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(source_name);
    format!("{base}.{}", kind.target_extension())
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    location: String,
    file_name: String,
    media_type: &'static str,
    bytes: Vec<u8>,
}

impl ConvertedFile {
    pub fn new(file_name: impl Into<String>, kind: ConversionKind, bytes: Vec<u8>) -> Self {
        Self {
            location: format!("blob:audioleaf/{}", uuid::Uuid::new_v4()),
            file_name: file_name.into(),
            media_type: kind.target_media_type(),
            bytes,
        }
    }

    /// Opaque handle identifying this result within the session.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        self.media_type
    }

    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write the converted bytes into `dir` under [`Self::file_name`].
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}
