//! Tesseract-backed recognition engine (requires tesseract installed).

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use audioleaf_core::{EngineError, PageBitmap, RecognitionEngine, RecognitionProgress};

/// Recognition engine shelling out to the local `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    lang: String,
}

impl TesseractEngine {
    /// Engine recognizing English text.
    pub fn new() -> Self {
        Self::with_language("eng")
    }

    /// Engine for a tesseract language pack, e.g. `"hin"` or `"eng+hin"`.
    pub fn with_language(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecognitionEngine for TesseractEngine {
    async fn load(&self) -> Result<(), EngineError> {
        let version = tokio::task::spawn_blocking(rusty_tesseract::get_tesseract_version)
            .await
            .map_err(EngineError::failed)?
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;
        debug!(version = %version.trim(), lang = %self.lang, "Found tesseract");
        Ok(())
    }

    async fn recognize(
        &self,
        bitmap: &PageBitmap,
        progress: RecognitionProgress,
    ) -> Result<String, EngineError> {
        use rusty_tesseract::{Args, Image};

        let (width, height) = (bitmap.width, bitmap.height);
        let pixels = bitmap.pixels.clone();
        let args = Args {
            lang: self.lang.clone(),
            ..Args::default()
        };

        progress(0.0);
        let report = Arc::clone(&progress);
        let text = tokio::task::spawn_blocking(move || {
            let rgba = image::RgbaImage::from_raw(width, height, pixels)
                .ok_or_else(|| EngineError::failed("bitmap does not match its dimensions"))?;

            // Tesseract works best on grayscale input
            let gray = image::DynamicImage::ImageRgba8(rgba).to_luma8();
            let tesseract_image = Image::from_dynamic_image(&image::DynamicImage::ImageLuma8(gray))
                .map_err(EngineError::failed)?;
            report(0.5);

            rusty_tesseract::image_to_string(&tesseract_image, &args).map_err(EngineError::failed)
        })
        .await
        .map_err(EngineError::failed)??;

        progress(1.0);
        Ok(text)
    }

    async fn terminate(&self) -> Result<(), EngineError> {
        // Each job runs its own tesseract process; nothing stays resident.
        Ok(())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
