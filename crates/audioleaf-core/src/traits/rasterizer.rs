use async_trait::async_trait;

use crate::error::EngineError;
use crate::types::{PageBitmap, Viewport};

/// Host-provided surface that draws a document page into a bitmap.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Pixel size of a page rendered at `scale`.
    async fn viewport(
        &self,
        source: &[u8],
        page_number: u32,
        scale: f32,
    ) -> Result<Viewport, EngineError>;

    /// Draw a page into an RGBA8 bitmap of exactly `viewport` size.
    async fn draw(
        &self,
        source: &[u8],
        page_number: u32,
        viewport: Viewport,
    ) -> Result<PageBitmap, EngineError>;

    /// Get the surface name.
    fn name(&self) -> &str;
}
