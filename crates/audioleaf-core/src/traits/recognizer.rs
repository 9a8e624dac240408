//! OCR engine trait.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::EngineError;
use crate::types::PageBitmap;

/// Callback receiving an engine's progress for one job, in `[0.0, 1.0]`.
pub type RecognitionProgress = Arc<dyn Fn(f32) + Send + Sync>;

/// Core OCR trait - long-lived engines that turn bitmaps into text.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Load models and start workers. Called once per engine lifetime.
    async fn load(&self) -> Result<(), EngineError>;

    /// Recognize the text in one bitmap.
    async fn recognize(
        &self,
        bitmap: &PageBitmap,
        progress: RecognitionProgress,
    ) -> Result<String, EngineError>;

    /// Release engine resources.
    async fn terminate(&self) -> Result<(), EngineError>;

    /// Get the engine name.
    fn name(&self) -> &str;
}
