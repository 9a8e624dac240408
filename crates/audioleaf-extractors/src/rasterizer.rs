//! Page rasterization through a host render surface.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use audioleaf_core::{EngineError, PageBitmap, RenderSurface, Viewport};

/// Errors from rendering one page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("Render surface failed: {0}")]
    Surface(#[from] EngineError),

    #[error("Rendering timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rendered bitmap is {actual:?}, expected {expected:?}")]
    SizeMismatch { expected: Viewport, actual: Viewport },
}

/// Renders single pages to RGBA bitmaps at a fixed scale.
pub struct PageRasterizer {
    surface: Arc<dyn RenderSurface>,
    scale: f32,
    timeout: Duration,
}

impl PageRasterizer {
    pub fn new(surface: Arc<dyn RenderSurface>, scale: f32, timeout: Duration) -> Self {
        Self {
            surface,
            scale,
            timeout,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn surface_name(&self) -> &str {
        self.surface.name()
    }

    /// Render a 1-based page of `source` into a bitmap sized to its viewport.
    pub async fn render(&self, source: &[u8], page_number: u32) -> Result<PageBitmap, RasterError> {
        let work = async {
            let viewport = self.surface.viewport(source, page_number, self.scale).await?;
            let bitmap = self.surface.draw(source, page_number, viewport).await?;
            Ok::<_, RasterError>((viewport, bitmap))
        };

        let (viewport, bitmap) = tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| RasterError::Timeout(self.timeout))??;

        if bitmap.viewport() != viewport || !bitmap.is_consistent() {
            return Err(RasterError::SizeMismatch {
                expected: viewport,
                actual: bitmap.viewport(),
            });
        }

        debug!(
            page = page_number,
            width = viewport.width,
            height = viewport.height,
            surface = self.surface.name(),
            "Page rendered"
        );
        Ok(bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct LetterSurface {
        /// Draw bitmaps this many pixels wider than the viewport.
        skew: u32,
        stall: bool,
    }

    #[async_trait]
    impl RenderSurface for LetterSurface {
        async fn viewport(
            &self,
            _source: &[u8],
            _page_number: u32,
            scale: f32,
        ) -> Result<Viewport, EngineError> {
            Ok(Viewport::scaled(612.0, 792.0, scale))
        }

        async fn draw(
            &self,
            _source: &[u8],
            page_number: u32,
            viewport: Viewport,
        ) -> Result<PageBitmap, EngineError> {
            if self.stall {
                std::future::pending::<()>().await;
            }
            if page_number == 0 {
                return Err(EngineError::failed("no page zero"));
            }
            Ok(PageBitmap::blank(Viewport::new(
                viewport.width + self.skew,
                viewport.height,
            )))
        }

        fn name(&self) -> &str {
            "letter"
        }
    }

    fn rasterizer(skew: u32, stall: bool) -> PageRasterizer {
        PageRasterizer::new(
            Arc::new(LetterSurface { skew, stall }),
            2.0,
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn test_renders_at_scale() {
        let bitmap = rasterizer(0, false).render(b"%PDF", 1).await.unwrap();
        assert_eq!(bitmap.viewport(), Viewport::new(1224, 1584));
    }

    #[tokio::test]
    async fn test_rejects_mismatched_bitmap() {
        let err = rasterizer(1, false).render(b"%PDF", 1).await.unwrap_err();
        assert!(matches!(err, RasterError::SizeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_surface_error() {
        let err = rasterizer(0, false).render(b"%PDF", 0).await.unwrap_err();
        assert!(matches!(err, RasterError::Surface(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_surface_times_out() {
        let err = rasterizer(0, true).render(b"%PDF", 1).await.unwrap_err();
        assert_eq!(err, RasterError::Timeout(Duration::from_secs(30)));
    }
}
