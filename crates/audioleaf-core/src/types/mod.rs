//! Core types for audioleaf.

mod bitmap;
mod document;
mod narration;
mod page;
mod progress;
mod voice;

pub use bitmap::{PageBitmap, Viewport};
pub use document::*;
pub use narration::*;
pub use page::{ExtractionResult, Page, PageSource};
pub use progress::ExtractionProgress;
pub use voice::{VoiceFilter, VoiceProfile};
