//! Narration engine trait.

use tokio::sync::watch;

use crate::types::{NarrationRequest, VoiceProfile};

/// Side-effecting text-to-speech engine.
///
/// Commands are fire-and-forget. Lifecycle changes come back as events on
/// the channel carried by each [`NarrationRequest`]; the paused flag is only
/// observable by asking [`NarrationEngine::is_paused`].
pub trait NarrationEngine: Send + Sync {
    /// Queue an utterance.
    fn speak(&self, request: NarrationRequest);

    fn pause(&self);

    fn resume(&self);

    /// Drop the current and any queued utterances.
    fn cancel(&self);

    /// The engine's own paused flag.
    fn is_paused(&self) -> bool;

    /// Subscribe to the engine's voice catalog.
    fn voices(&self) -> watch::Receiver<Vec<VoiceProfile>>;
}
