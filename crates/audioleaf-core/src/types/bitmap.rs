//! Rendered page bitmaps.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Viewport for a page of the given size in points, scaled by `scale`.
    /// Dimensions are floored and never drop below one pixel.
    pub fn scaled(page_width: f32, page_height: f32, scale: f32) -> Self {
        let dim = |v: f32| ((v * scale).floor() as u32).max(1);
        Self {
            width: dim(page_width),
            height: dim(page_height),
        }
    }

    /// Byte length of an RGBA8 buffer covering this viewport.
    pub fn rgba_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// An RGBA8 bitmap of one rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PageBitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// An all-white bitmap.
    pub fn blank(viewport: Viewport) -> Self {
        Self::new(viewport.width, viewport.height, vec![255; viewport.rgba_len()])
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Whether the pixel buffer length matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.viewport().rgba_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_viewport() {
        let vp = Viewport::scaled(612.0, 792.0, 2.0);
        assert_eq!(vp, Viewport::new(1224, 1584));

        let tiny = Viewport::scaled(0.2, 0.2, 1.0);
        assert_eq!(tiny, Viewport::new(1, 1));
    }

    #[test]
    fn test_blank_bitmap_is_consistent() {
        let bitmap = PageBitmap::blank(Viewport::new(3, 2));
        assert_eq!(bitmap.pixels.len(), 24);
        assert!(bitmap.is_consistent());

        let broken = PageBitmap::new(3, 2, vec![0; 5]);
        assert!(!broken.is_consistent());
    }
}
