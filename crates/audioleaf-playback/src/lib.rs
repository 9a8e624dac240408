//! audioleaf-playback - Read-aloud control for extracted documents.
//!
//! [`PlaybackController`] walks an [`ExtractionResult`] page by page and
//! drives a [`NarrationEngine`]; [`VoiceRegistry`] keeps the offered voices
//! in step with the engine's catalog.
//!
//! [`ExtractionResult`]: audioleaf_core::ExtractionResult
//! [`NarrationEngine`]: audioleaf_core::NarrationEngine

mod controller;
mod voices;

pub use controller::{
    AmbientStatus, Controls, PlaybackController, PlaybackError, PlaybackResult, PlaybackState,
};
pub use voices::VoiceRegistry;
